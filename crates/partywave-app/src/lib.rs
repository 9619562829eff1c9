// Application layer of the PartyWave admin console: entity slices, the typed
// store, form drafts, view snapshots and the async orchestration loop.

pub mod app;
pub mod form;
pub mod protocol;
pub mod slice;
pub mod store;
pub mod view;
