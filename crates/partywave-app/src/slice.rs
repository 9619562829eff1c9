// Per-entity state slice and its reducer.
//
// One `EntityState<E>` exists per entity kind. Request tasks report their
// outcome as `SliceAction<E>` values which `apply` folds into the state.

use partywave_core::client::{Alert, Page};
use partywave_core::model::{Entity, EntityKind, ListMode};
use partywave_core::pagination::{merge_scrolled, Links};
use serde_json::Value;

use crate::protocol::Notice;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    pub loading: bool,
    pub updating: bool,
    pub update_success: bool,
    pub error_message: Option<String>,
    /// Record shown by detail/edit/delete views.
    pub entity: E,
    pub entities: Vec<E>,
    pub total_items: u64,
    pub links: Links,
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        EntityState {
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
            entity: E::default(),
            entities: Vec::new(),
            total_items: 0,
            links: Links::default(),
        }
    }
}

/// Outcome (or start) of one request against a slice.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceAction<E> {
    FetchListPending,
    FetchListFulfilled { page: Page<E>, mode: ListMode },
    FetchEntityPending,
    FetchEntityFulfilled(E),
    /// Create, update, patch or delete started.
    MutationPending,
    /// Create, update or patch succeeded.
    MutationFulfilled { entity: E, alert: Option<Alert> },
    DeleteFulfilled { alert: Option<Alert> },
    Rejected(String),
    Reset,
}

impl<E: Entity> SliceAction<E> {
    /// Status-bar notice for completed mutations and failures.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SliceAction::MutationFulfilled {
                alert: Some(alert), ..
            }
            | SliceAction::DeleteFulfilled { alert: Some(alert) } => {
                Some(Notice::info(alert.message()))
            }
            SliceAction::Rejected(message) => Some(Notice::error(message.clone())),
            _ => None,
        }
    }
}

impl<E: Entity> EntityState<E> {
    pub fn apply(&mut self, action: SliceAction<E>) {
        match action {
            SliceAction::FetchListPending | SliceAction::FetchEntityPending => {
                self.error_message = None;
                self.update_success = false;
                self.loading = true;
            }
            SliceAction::MutationPending => {
                self.error_message = None;
                self.update_success = false;
                self.updating = true;
            }
            SliceAction::FetchListFulfilled { page, mode } => {
                self.loading = false;
                self.entities = match mode {
                    ListMode::InfiniteScroll => {
                        merge_scrolled(&self.entities, page.items, &page.links)
                    }
                    ListMode::Sorted | ListMode::Paginated => page.items,
                };
                self.total_items = page.total_items;
                self.links = page.links;
            }
            SliceAction::FetchEntityFulfilled(entity) => {
                self.loading = false;
                self.entity = entity;
            }
            SliceAction::MutationFulfilled { entity, .. } => {
                self.loading = false;
                self.updating = false;
                self.update_success = true;
                self.entity = entity;
            }
            SliceAction::DeleteFulfilled { .. } => {
                self.updating = false;
                self.update_success = true;
                self.entity = E::default();
            }
            SliceAction::Rejected(message) => {
                self.loading = false;
                self.updating = false;
                self.update_success = false;
                self.error_message = Some(message);
            }
            SliceAction::Reset => *self = EntityState::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Type-erased read access
// ---------------------------------------------------------------------------

/// Read-only view of a slice with the entity type erased to JSON, so views
/// can be built for any kind from the store without naming `E`.
pub trait SliceView {
    fn kind(&self) -> EntityKind;
    fn loading(&self) -> bool;
    fn updating(&self) -> bool;
    fn update_success(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
    fn total_items(&self) -> u64;
    fn links(&self) -> Links;
    fn entity_json(&self) -> Value;
    fn entities_json(&self) -> Vec<Value>;
}

impl<E: Entity> SliceView for EntityState<E> {
    fn kind(&self) -> EntityKind {
        E::KIND
    }

    fn loading(&self) -> bool {
        self.loading
    }

    fn updating(&self) -> bool {
        self.updating
    }

    fn update_success(&self) -> bool {
        self.update_success
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn total_items(&self) -> u64 {
        self.total_items
    }

    fn links(&self) -> Links {
        self.links
    }

    fn entity_json(&self) -> Value {
        serde_json::to_value(&self.entity).unwrap_or(Value::Null)
    }

    fn entities_json(&self) -> Vec<Value> {
        self.entities
            .iter()
            .filter_map(|e| serde_json::to_value(e).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partywave_core::client::Page;
    use partywave_core::model::{ChatMessage, EntityId, Room};

    fn room(id: i64, name: &str) -> Room {
        Room {
            id: Some(EntityId::Number(id)),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn page(items: Vec<Room>, total: u64) -> Page<Room> {
        Page {
            items,
            total_items: total,
            links: Links::default(),
        }
    }

    #[test]
    fn pending_clears_error_and_success() {
        let mut state = EntityState::<Room> {
            error_message: Some("boom".into()),
            update_success: true,
            ..Default::default()
        };
        state.apply(SliceAction::FetchListPending);
        assert!(state.loading);
        assert!(!state.update_success);
        assert!(state.error_message.is_none());

        state.apply(SliceAction::MutationPending);
        assert!(state.updating);
    }

    #[test]
    fn list_fulfilled_replaces_entities() {
        let mut state = EntityState::<Room>::default();
        state.apply(SliceAction::FetchListFulfilled {
            page: page(vec![room(1, "a"), room(2, "b")], 2),
            mode: ListMode::Sorted,
        });
        state.apply(SliceAction::FetchListFulfilled {
            page: page(vec![room(3, "c")], 7),
            mode: ListMode::Paginated,
        });
        assert!(!state.loading);
        assert_eq!(state.entities, vec![room(3, "c")]);
        assert_eq!(state.total_items, 7);
    }

    #[test]
    fn infinite_scroll_appends_pages() {
        let links = Links {
            first: Some(0),
            next: Some(1),
            last: Some(1),
            ..Default::default()
        };
        let msg = |id: i64| ChatMessage {
            id: Some(EntityId::Number(id)),
            ..Default::default()
        };
        let mut state = EntityState::<ChatMessage>::default();
        for items in [vec![msg(1), msg(2)], vec![msg(3)]] {
            state.apply(SliceAction::FetchListFulfilled {
                page: Page {
                    items,
                    total_items: 3,
                    links,
                },
                mode: ListMode::InfiniteScroll,
            });
        }
        assert_eq!(state.entities.len(), 3);
        assert_eq!(state.links, links);
    }

    #[test]
    fn mutation_fulfilled_sets_entity_and_success() {
        let mut state = EntityState::<Room>::default();
        state.apply(SliceAction::MutationPending);
        state.apply(SliceAction::MutationFulfilled {
            entity: room(7, "Friday Mix"),
            alert: None,
        });
        assert!(state.update_success);
        assert!(!state.updating);
        assert_eq!(state.entity.id, Some(EntityId::Number(7)));
    }

    #[test]
    fn delete_fulfilled_resets_entity() {
        let mut state = EntityState::<Room> {
            entity: room(7, "x"),
            ..Default::default()
        };
        state.apply(SliceAction::DeleteFulfilled { alert: None });
        assert!(state.update_success);
        assert_eq!(state.entity, Room::default());
    }

    #[test]
    fn rejected_records_message() {
        let mut state = EntityState::<Room>::default();
        state.apply(SliceAction::MutationPending);
        state.apply(SliceAction::Rejected("400: bad".into()));
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(SliceView::error_message(&state), Some("400: bad"));

        let notice = SliceAction::<Room>::Rejected("400: bad".into()).notice().unwrap();
        assert!(notice.is_error);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut state = EntityState::<Room>::default();
        state.apply(SliceAction::Rejected("x".into()));
        state.apply(SliceAction::Reset);
        assert_eq!(state, EntityState::default());
        assert_eq!(state.entity.is_public, Some(false));
    }

    #[test]
    fn erased_view_serializes_records() {
        let mut state = EntityState::<Room>::default();
        state.apply(SliceAction::FetchListFulfilled {
            page: page(vec![room(1, "Lobby")], 1),
            mode: ListMode::Sorted,
        });
        let rows = state.entities_json();
        assert_eq!(rows[0]["name"], "Lobby");
        assert_eq!(SliceView::kind(&state), EntityKind::Room);
    }
}
