// Library root for the PartyWave admin core: configuration, domain models,
// and the generic REST resource client shared by the app and TUI crates.

pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod model;
pub mod pagination;
pub mod query;

pub use client::{Alert, ApiClient, Page, Resource, Saved};
pub use error::{ApiError, ApiResult};
pub use model::{Entity, EntityId, EntityKind, FieldKind, FieldSpec, ListMode};
