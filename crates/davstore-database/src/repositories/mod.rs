//! Repository implementations for the `cas` schema.

pub mod collection;
pub mod history;
pub mod item;
pub mod metadata;
pub mod state;
pub mod tree;

pub use collection::CollectionRepository;
pub use history::HistoryRepository;
pub use item::ItemRepository;
pub use metadata::MetadataRepository;
pub use state::StateRepository;
pub use tree::TreeRepository;
