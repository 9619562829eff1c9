// Room aggregate: rooms, tags, membership, access grants and invitations.

use super::{EntityId, EntityKind, FieldKind, FieldSpec, RoomMemberRole};
use super::AppUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Default for Room {
    fn default() -> Self {
        Room {
            id: None,
            name: None,
            description: None,
            max_participants: None,
            is_public: Some(false),
            created_at: None,
            updated_at: None,
            tags: None,
        }
    }
}

impl Room {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::new("description", "Description", FieldKind::Text { max_len: Some(500) })
            .detail_only(),
        FieldSpec::integer("maxParticipants", "Max Participants"),
        FieldSpec::new("isPublic", "Is Public", FieldKind::Boolean).required(),
        FieldSpec::instant("createdAt", "Created At"),
        FieldSpec::instant("updatedAt", "Updated At").detail_only(),
        FieldSpec::new(
            "tags",
            "Tags",
            FieldKind::ManyRelation {
                target: EntityKind::Tag,
            },
        ),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<Room>>,
}

impl Tag {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::new(
            "rooms",
            "Rooms",
            FieldKind::ManyRelation {
                target: EntityKind::Room,
            },
        )
        .detail_only(),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoomMemberRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user: Option<AppUser>,
}

impl RoomMember {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::instant("joinedAt", "Joined At").required(),
        FieldSpec::instant("lastActiveAt", "Last Active At"),
        FieldSpec::new("role", "Role", FieldKind::Enum(RoomMemberRole::VALUES)),
        FieldSpec::relation("room", "Room", EntityKind::Room),
        FieldSpec::relation("appUser", "App User", EntityKind::AppUser),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomAccess {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user: Option<AppUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<AppUser>,
}

impl RoomAccess {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::instant("grantedAt", "Granted At"),
        FieldSpec::relation("room", "Room", EntityKind::Room),
        FieldSpec::relation("appUser", "App User", EntityKind::AppUser),
        FieldSpec::relation("grantedBy", "Granted By", EntityKind::AppUser),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomInvitation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<AppUser>,
}

impl Default for RoomInvitation {
    fn default() -> Self {
        RoomInvitation {
            id: None,
            token: None,
            created_at: None,
            expires_at: None,
            max_uses: None,
            used_count: None,
            is_active: Some(false),
            room: None,
            created_by: None,
        }
    }
}

impl RoomInvitation {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("token", "Token").required(),
        FieldSpec::instant("createdAt", "Created At").required(),
        FieldSpec::instant("expiresAt", "Expires At"),
        FieldSpec::integer("maxUses", "Max Uses"),
        FieldSpec::integer("usedCount", "Used Count").required(),
        FieldSpec::new("isActive", "Is Active", FieldKind::Boolean),
        FieldSpec::relation("room", "Room", EntityKind::Room),
        FieldSpec::relation("createdBy", "Created By", EntityKind::AppUser),
    ];
}
