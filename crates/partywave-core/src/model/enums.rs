// Enumerations shared between the backend DTOs and the admin forms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppUserStatus {
    Online,
    Offline,
    Banned,
}

impl AppUserStatus {
    pub const VALUES: &'static [&'static str] = &["ONLINE", "OFFLINE", "BANNED"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomMemberRole {
    Owner,
    Dj,
    Moderator,
    Participant,
}

impl RoomMemberRole {
    pub const VALUES: &'static [&'static str] = &["OWNER", "DJ", "MODERATOR", "PARTICIPANT"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Skiptrack,
    Kickuser,
}

impl VoteType {
    pub const VALUES: &'static [&'static str] = &["SKIPTRACK", "KICKUSER"];
}
