//! The collection store: path-addressed CRUD over collections and items.
//!
//! Every public operation opens one transaction, runs all of its reads and
//! writes on it and commits at the end. Any error drops the transaction,
//! which rolls it back.

pub mod collection;
pub mod filter;
pub mod lock;
pub mod node;
pub mod storage;

pub use collection::CollectionHandle;
pub use filter::{FilteredItems, ItemFilter, MatchType};
pub use lock::{LockMode, StoreLock};
pub use node::DavNode;
pub use storage::CollectionStore;
