// User-centric entities: accounts, stats, images and stored tokens.

use super::{AppUserStatus, EntityId, EntityKind, FieldKind, FieldSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppUserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user_stats: Option<AppUserStats>,
}

impl AppUser {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("spotifyUserId", "Spotify User Id").required(),
        FieldSpec::text("displayName", "Display Name").required(),
        FieldSpec::text("email", "Email").required(),
        FieldSpec::text("country", "Country"),
        FieldSpec::text("href", "Href").detail_only(),
        FieldSpec::text("url", "Url").detail_only(),
        FieldSpec::text("type", "Type").detail_only(),
        FieldSpec::text("ipAddress", "Ip Address").detail_only(),
        FieldSpec::instant("lastActiveAt", "Last Active At"),
        FieldSpec::new("status", "Status", FieldKind::Enum(AppUserStatus::VALUES)),
        FieldSpec::relation("appUserStats", "App User Stats", EntityKind::AppUserStats)
            .detail_only(),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppUserStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_like: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_dislike: Option<i64>,
}

impl AppUserStats {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::integer("totalLike", "Total Like"),
        FieldSpec::integer("totalDislike", "Total Dislike"),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppUserImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user: Option<AppUser>,
}

impl AppUserImage {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("url", "Url").required(),
        FieldSpec::text("height", "Height"),
        FieldSpec::text("width", "Width"),
        FieldSpec::relation("appUser", "App User", EntityKind::AppUser),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user: Option<AppUser>,
}

impl UserToken {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("accessToken", "Access Token").required(),
        FieldSpec::text("refreshToken", "Refresh Token").required(),
        FieldSpec::text("tokenType", "Token Type"),
        FieldSpec::instant("expiresAt", "Expires At"),
        FieldSpec::text("scope", "Scope").detail_only(),
        FieldSpec::relation("appUser", "App User", EntityKind::AppUser).required(),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_user: Option<AppUser>,
}

impl RefreshToken {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("tokenHash", "Token Hash").required(),
        FieldSpec::instant("expiresAt", "Expires At").required(),
        FieldSpec::instant("createdAt", "Created At").required(),
        FieldSpec::instant("revokedAt", "Revoked At"),
        FieldSpec::text("deviceInfo", "Device Info").detail_only(),
        FieldSpec::text("ipAddress", "Ip Address").detail_only(),
        FieldSpec::relation("appUser", "App User", EntityKind::AppUser),
    ];
}
