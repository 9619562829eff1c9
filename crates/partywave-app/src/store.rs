// Typed store of every entity slice, and the request tasks that feed it.
//
// `entity_slices!` generates the store struct, the `Action` enum wrapping a
// `SliceAction<E>` per entity, and the by-kind dispatch glue, so adding an
// entity is one line in the invocation at the bottom of this file.

use partywave_core::client::Resource;
use partywave_core::model::{
    AppUser, AppUserImage, AppUserStats, ChatMessage, Entity, EntityId, EntityKind, ListMode,
    RefreshToken, Room, RoomAccess, RoomInvitation, RoomMember, Tag, UserToken, Vote,
};
use partywave_core::query::ListQuery;
use partywave_core::{ApiClient, ApiError};
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::Notice;
use crate::slice::{EntityState, SliceAction, SliceView};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// One request against an entity collection. Payloads are erased JSON so the
/// app loop can build them without naming the entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    FetchList(ListQuery),
    FetchOne(EntityId),
    Create(Value),
    Update(Value),
    Patch {
        id: EntityId,
        fields: Map<String, Value>,
    },
    Delete(EntityId),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::FetchList(_) => "fetch list",
            Operation::FetchOne(_) => "fetch",
            Operation::Create(_) => "create",
            Operation::Update(_) => "update",
            Operation::Patch { .. } => "patch",
            Operation::Delete(_) => "delete",
        }
    }

    /// Pending action applied to the slice when the request starts.
    fn pending<E>(&self) -> SliceAction<E> {
        match self {
            Operation::FetchList(_) => SliceAction::FetchListPending,
            Operation::FetchOne(_) => SliceAction::FetchEntityPending,
            _ => SliceAction::MutationPending,
        }
    }
}

// ---------------------------------------------------------------------------
// Generated store
// ---------------------------------------------------------------------------

macro_rules! entity_slices {
    ($($field:ident : $ty:ident),* $(,)?) => {
        /// One slice per entity kind.
        #[derive(Debug, Default)]
        pub struct Store {
            $(pub $field: EntityState<$ty>,)*
        }

        /// Slice action tagged with its entity type.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Action {
            $($ty(SliceAction<$ty>),)*
        }

        impl Action {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Action::$ty(_) => EntityKind::$ty,)*
                }
            }

            pub fn notice(&self) -> Option<Notice> {
                match self {
                    $(Action::$ty(action) => action.notice(),)*
                }
            }
        }

        impl Store {
            pub fn apply(&mut self, action: Action) {
                match action {
                    $(Action::$ty(action) => self.$field.apply(action),)*
                }
            }

            pub fn slice(&self, kind: EntityKind) -> &dyn SliceView {
                match kind {
                    $(EntityKind::$ty => &self.$field,)*
                }
            }

            pub fn reset(&mut self, kind: EntityKind) {
                match kind {
                    $(EntityKind::$ty => self.$field.apply(SliceAction::Reset),)*
                }
            }

            /// Apply the pending transition for `op` and spawn the request.
            pub fn dispatch(
                &mut self,
                client: &ApiClient,
                kind: EntityKind,
                op: Operation,
                tx: &mpsc::Sender<Action>,
            ) {
                debug!(entity = kind.entity_name(), op = op.name(), "dispatch");
                match kind {
                    $(EntityKind::$ty => {
                        self.$field.apply(op.pending());
                        tokio::spawn(run_operation::<$ty>(
                            client.resource(),
                            op,
                            tx.clone(),
                            Action::$ty,
                        ));
                    })*
                }
            }
        }
    };
}

entity_slices!(
    app_user: AppUser,
    app_user_stats: AppUserStats,
    app_user_image: AppUserImage,
    room: Room,
    tag: Tag,
    room_member: RoomMember,
    room_access: RoomAccess,
    room_invitation: RoomInvitation,
    chat_message: ChatMessage,
    vote: Vote,
    user_token: UserToken,
    refresh_token: RefreshToken,
);

// ---------------------------------------------------------------------------
// Request task
// ---------------------------------------------------------------------------

fn rejected<E>(op: &str, err: ApiError) -> SliceAction<E> {
    warn!(op, error = %err, "request failed");
    SliceAction::Rejected(err.to_string())
}

fn decode<E: Entity>(payload: Value) -> Result<E, ApiError> {
    Ok(serde_json::from_value(payload)?)
}

/// Execute `op` and report the outcome. Successful mutations of sorted
/// entities also re-fetch the whole list with an empty query. Paged and
/// scrolled lists are re-fetched by the list route with their own page.
async fn run_operation<E: Entity>(
    resource: Resource<E>,
    op: Operation,
    tx: mpsc::Sender<Action>,
    wrap: fn(SliceAction<E>) -> Action,
) {
    let name = op.name();
    let (outcome, mutated) = match op {
        Operation::FetchList(query) => {
            let outcome = match resource.list(&query).await {
                Ok(page) => SliceAction::FetchListFulfilled {
                    page,
                    mode: E::KIND.list_mode(),
                },
                Err(e) => rejected(name, e),
            };
            (outcome, false)
        }
        Operation::FetchOne(id) => {
            let outcome = match resource.get(&id).await {
                Ok(entity) => SliceAction::FetchEntityFulfilled(entity),
                Err(e) => rejected(name, e),
            };
            (outcome, false)
        }
        Operation::Create(payload) => {
            let result = match decode::<E>(payload) {
                Ok(entity) => resource.create(&entity).await,
                Err(e) => Err(e),
            };
            saved_outcome(name, result)
        }
        Operation::Update(payload) => {
            let result = match decode::<E>(payload) {
                Ok(entity) => resource.update(&entity).await,
                Err(e) => Err(e),
            };
            saved_outcome(name, result)
        }
        Operation::Patch { id, fields } => {
            saved_outcome(name, resource.partial_update(Some(&id), fields).await)
        }
        Operation::Delete(id) => match resource.delete(&id).await {
            Ok(alert) => {
                info!(entity = E::KIND.entity_name(), %id, "deleted");
                (SliceAction::DeleteFulfilled { alert }, true)
            }
            Err(e) => (rejected(name, e), false),
        },
    };

    let refresh = mutated && E::KIND.list_mode() == ListMode::Sorted;
    if refresh {
        send(&tx, wrap(SliceAction::FetchListPending)).await;
    }
    send(&tx, wrap(outcome)).await;

    if refresh {
        let outcome = match resource.list(&ListQuery::empty()).await {
            Ok(page) => SliceAction::FetchListFulfilled {
                page,
                mode: E::KIND.list_mode(),
            },
            Err(e) => rejected("refresh list", e),
        };
        send(&tx, wrap(outcome)).await;
    }
}

fn saved_outcome<E: Entity>(
    op: &str,
    result: Result<partywave_core::Saved<E>, ApiError>,
) -> (SliceAction<E>, bool) {
    match result {
        Ok(saved) => {
            info!(
                entity = E::KIND.entity_name(),
                id = ?saved.entity.id(),
                op,
                "saved"
            );
            (
                SliceAction::MutationFulfilled {
                    entity: saved.entity,
                    alert: saved.alert,
                },
                true,
            )
        }
        Err(e) => (rejected(op, e), false),
    }
}

async fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).await.is_err() {
        debug!("action channel closed, dropping result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partywave_core::client::Page;
    use partywave_core::pagination::Links;

    #[test]
    fn actions_route_to_their_slice() {
        let mut store = Store::default();
        let tag = Tag {
            id: Some(EntityId::Number(1)),
            name: Some("house".into()),
            ..Default::default()
        };
        let action = Action::Tag(SliceAction::FetchListFulfilled {
            page: Page {
                items: vec![tag.clone()],
                total_items: 1,
                links: Links::default(),
            },
            mode: ListMode::Sorted,
        });
        assert_eq!(action.kind(), EntityKind::Tag);
        store.apply(action);

        assert_eq!(store.tag.entities, vec![tag]);
        assert!(store.room.entities.is_empty());
        assert_eq!(store.slice(EntityKind::Tag).entities_json()[0]["name"], "house");
    }

    #[test]
    fn reset_only_touches_one_slice() {
        let mut store = Store::default();
        store.apply(Action::Vote(SliceAction::Rejected("x".into())));
        store.apply(Action::Room(SliceAction::Rejected("y".into())));
        store.reset(EntityKind::Vote);
        assert!(store.slice(EntityKind::Vote).error_message().is_none());
        assert_eq!(store.slice(EntityKind::Room).error_message(), Some("y"));
    }

    #[test]
    fn every_kind_has_a_slice() {
        let store = Store::default();
        for kind in EntityKind::all() {
            assert_eq!(store.slice(*kind).kind(), *kind);
        }
    }

    #[test]
    fn rejected_actions_produce_error_notices() {
        let action = Action::Room(SliceAction::Rejected("500: Internal Server Error".into()));
        let notice = action.notice().unwrap();
        assert!(notice.is_error);
        assert_eq!(notice.text, "500: Internal Server Error");
    }
}
