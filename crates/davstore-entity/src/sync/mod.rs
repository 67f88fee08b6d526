//! Sync token and snapshot entities.

pub mod state;
pub mod token;

pub use state::{CollectionState, SyncState};
pub use token::{SYNC_TOKEN_PREFIX, SyncToken};
