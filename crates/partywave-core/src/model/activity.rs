// In-room activity: chat messages and votes.

use super::{AppUser, EntityId, EntityKind, FieldKind, FieldSpec, Room, VoteType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<AppUser>,
}

impl ChatMessage {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("content", "Content", FieldKind::Text { max_len: Some(1000) }).required(),
        FieldSpec::instant("sentAt", "Sent At").required(),
        FieldSpec::relation("room", "Room", EntityKind::Room),
        FieldSpec::relation("sender", "Sender", EntityKind::AppUser),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_type: Option<VoteType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_item_id: Option<String>,
    /// Optional on the wire; the form still requires it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter: Option<AppUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user: Option<AppUser>,
}

impl Vote {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("voteType", "Vote Type", FieldKind::Enum(VoteType::VALUES)).required(),
        FieldSpec::text("playlistItemId", "Playlist Item Id"),
        FieldSpec::instant("createdAt", "Created At").required(),
        FieldSpec::relation("room", "Room", EntityKind::Room),
        FieldSpec::relation("voter", "Voter", EntityKind::AppUser),
        FieldSpec::relation("targetUser", "Target User", EntityKind::AppUser),
    ];
}
