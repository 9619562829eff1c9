// Domain models for the PartyWave backend entities.

mod activity;
mod enums;
mod field;
mod id;
mod kind;
mod room;
mod user;

pub use activity::{ChatMessage, Vote};
pub use enums::{AppUserStatus, RoomMemberRole, VoteType};
pub use field::{FieldKind, FieldSpec};
pub use id::EntityId;
pub use kind::{EntityKind, ListMode};
pub use room::{Room, RoomAccess, RoomInvitation, RoomMember, Tag};
pub use user::{AppUser, AppUserImage, AppUserStats, RefreshToken, UserToken};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A record type served by one REST collection.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Default + fmt::Debug + Send + Sync + 'static
{
    const KIND: EntityKind;

    /// Server-assigned id; `None` for records not yet created.
    fn id(&self) -> Option<&EntityId>;
}

macro_rules! impl_entity {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> Option<&EntityId> {
                    self.id.as_ref()
                }
            }
        )*
    };
}

impl_entity!(
    AppUser,
    AppUserStats,
    AppUserImage,
    Room,
    Tag,
    RoomMember,
    RoomAccess,
    RoomInvitation,
    ChatMessage,
    Vote,
    UserToken,
    RefreshToken,
);
