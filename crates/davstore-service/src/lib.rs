//! # davstore-service
//!
//! The storage and sync core of davstore.
//!
//! - [`tree`] resolves slash-delimited paths with one N-join query
//! - [`version`] keeps the per-href history etag chain and its tombstones
//! - [`sync`] folds collection state into tokens and diffs snapshots
//! - [`store`] exposes path-addressed CRUD, one transaction per operation
//! - [`parser`] reads vCard/iCalendar payloads for UIDs and search columns

pub mod parser;
pub mod store;
pub mod sync;
pub mod tree;
pub mod version;

pub use parser::{ItemParser, ParsedItem, VObjectParser};
pub use store::{
    CollectionHandle, CollectionStore, DavNode, FilteredItems, ItemFilter, LockMode, MatchType,
    StoreLock,
};
pub use sync::{SyncEngine, SyncOutcome};
pub use tree::{Resolution, TreeResolver};
pub use version::{PurgeStats, VersionTracker};
