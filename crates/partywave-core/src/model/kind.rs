// The twelve administered entity kinds and their static metadata.

use super::{
    AppUser, AppUserImage, AppUserStats, ChatMessage, FieldSpec, RefreshToken, Room, RoomAccess,
    RoomInvitation, RoomMember, Tag, UserToken, Vote,
};
use std::fmt;

/// How an entity's list view fetches and accumulates records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Whole collection in one request, sorted only.
    Sorted,
    /// Numbered pages replacing each other.
    Paginated,
    /// Pages appended as the user scrolls.
    InfiniteScroll,
}

impl ListMode {
    pub fn is_paged(self) -> bool {
        !matches!(self, ListMode::Sorted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
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
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::AppUser,
        EntityKind::AppUserStats,
        EntityKind::AppUserImage,
        EntityKind::Room,
        EntityKind::Tag,
        EntityKind::RoomMember,
        EntityKind::RoomAccess,
        EntityKind::RoomInvitation,
        EntityKind::ChatMessage,
        EntityKind::Vote,
        EntityKind::UserToken,
        EntityKind::RefreshToken,
    ];

    pub fn all() -> &'static [EntityKind] {
        &Self::ALL
    }

    /// REST collection path relative to the backend root.
    pub fn api_path(self) -> &'static str {
        match self {
            EntityKind::AppUser => "api/app-users",
            EntityKind::AppUserStats => "api/app-user-stats",
            EntityKind::AppUserImage => "api/app-user-images",
            EntityKind::Room => "api/rooms",
            EntityKind::Tag => "api/tags",
            EntityKind::RoomMember => "api/room-members",
            EntityKind::RoomAccess => "api/room-accesses",
            EntityKind::RoomInvitation => "api/room-invitations",
            EntityKind::ChatMessage => "api/chat-messages",
            EntityKind::Vote => "api/votes",
            EntityKind::UserToken => "api/user-tokens",
            EntityKind::RefreshToken => "api/refresh-tokens",
        }
    }

    /// Entity name as it appears in alert keys (`partywaveApp.roomMember.created`).
    pub fn entity_name(self) -> &'static str {
        match self {
            EntityKind::AppUser => "appUser",
            EntityKind::AppUserStats => "appUserStats",
            EntityKind::AppUserImage => "appUserImage",
            EntityKind::Room => "room",
            EntityKind::Tag => "tag",
            EntityKind::RoomMember => "roomMember",
            EntityKind::RoomAccess => "roomAccess",
            EntityKind::RoomInvitation => "roomInvitation",
            EntityKind::ChatMessage => "chatMessage",
            EntityKind::Vote => "vote",
            EntityKind::UserToken => "userToken",
            EntityKind::RefreshToken => "refreshToken",
        }
    }

    /// Plural heading for list views and the menu.
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::AppUser => "App Users",
            EntityKind::AppUserStats => "App User Stats",
            EntityKind::AppUserImage => "App User Images",
            EntityKind::Room => "Rooms",
            EntityKind::Tag => "Tags",
            EntityKind::RoomMember => "Room Members",
            EntityKind::RoomAccess => "Room Accesses",
            EntityKind::RoomInvitation => "Room Invitations",
            EntityKind::ChatMessage => "Chat Messages",
            EntityKind::Vote => "Votes",
            EntityKind::UserToken => "User Tokens",
            EntityKind::RefreshToken => "Refresh Tokens",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::AppUser => "App User",
            EntityKind::AppUserStats => "App User Stats",
            EntityKind::AppUserImage => "App User Image",
            EntityKind::Room => "Room",
            EntityKind::Tag => "Tag",
            EntityKind::RoomMember => "Room Member",
            EntityKind::RoomAccess => "Room Access",
            EntityKind::RoomInvitation => "Room Invitation",
            EntityKind::ChatMessage => "Chat Message",
            EntityKind::Vote => "Vote",
            EntityKind::UserToken => "User Token",
            EntityKind::RefreshToken => "Refresh Token",
        }
    }

    /// Look up a kind by its alert-key entity name.
    pub fn from_entity_name(name: &str) -> Option<EntityKind> {
        Self::ALL.into_iter().find(|k| k.entity_name() == name)
    }

    pub fn list_mode(self) -> ListMode {
        match self {
            EntityKind::Room | EntityKind::RoomMember | EntityKind::Vote => ListMode::Paginated,
            EntityKind::ChatMessage => ListMode::InfiniteScroll,
            _ => ListMode::Sorted,
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            EntityKind::AppUser => AppUser::FIELDS,
            EntityKind::AppUserStats => AppUserStats::FIELDS,
            EntityKind::AppUserImage => AppUserImage::FIELDS,
            EntityKind::Room => Room::FIELDS,
            EntityKind::Tag => Tag::FIELDS,
            EntityKind::RoomMember => RoomMember::FIELDS,
            EntityKind::RoomAccess => RoomAccess::FIELDS,
            EntityKind::RoomInvitation => RoomInvitation::FIELDS,
            EntityKind::ChatMessage => ChatMessage::FIELDS,
            EntityKind::Vote => Vote::FIELDS,
            EntityKind::UserToken => UserToken::FIELDS,
            EntityKind::RefreshToken => RefreshToken::FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Field used to label this entity when it is offered as a relation option.
    pub fn display_field(self) -> &'static str {
        match self {
            EntityKind::AppUser => "displayName",
            EntityKind::Room | EntityKind::Tag => "name",
            _ => "id",
        }
    }

    /// Distinct entity kinds referenced by this kind's relation fields.
    pub fn relation_targets(self) -> Vec<EntityKind> {
        let mut targets: Vec<EntityKind> = Vec::new();
        for field in self.fields() {
            if let Some(target) = field.kind.target() {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_modes() {
        assert_eq!(EntityKind::RoomMember.list_mode(), ListMode::Paginated);
        assert_eq!(EntityKind::Vote.list_mode(), ListMode::Paginated);
        assert_eq!(EntityKind::ChatMessage.list_mode(), ListMode::InfiniteScroll);
        assert_eq!(EntityKind::Room.list_mode(), ListMode::Paginated);
        assert_eq!(EntityKind::Tag.list_mode(), ListMode::Sorted);
        assert!(!ListMode::Sorted.is_paged());
    }

    #[test]
    fn entity_names_round_trip() {
        for kind in EntityKind::all() {
            assert_eq!(EntityKind::from_entity_name(kind.entity_name()), Some(*kind));
            assert!(kind.api_path().starts_with("api/"));
            assert!(!kind.fields().is_empty());
        }
    }

    #[test]
    fn vote_relations_are_deduplicated() {
        assert_eq!(
            EntityKind::Vote.relation_targets(),
            vec![EntityKind::Room, EntityKind::AppUser]
        );
        assert!(EntityKind::AppUserStats.relation_targets().is_empty());
    }

    #[test]
    fn required_fields_follow_backend_constraints() {
        let required: Vec<&str> = EntityKind::RoomInvitation
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["token", "createdAt", "usedCount"]);
        let required: Vec<&str> = EntityKind::UserToken
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["accessToken", "refreshToken", "appUser"]);
        assert_eq!(
            EntityKind::ChatMessage.field("content").map(|f| f.kind),
            Some(crate::model::FieldKind::Text { max_len: Some(1000) })
        );
    }
}
