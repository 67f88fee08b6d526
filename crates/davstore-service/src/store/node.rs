//! Results of a path lookup.

use davstore_entity::item::Item;

use super::collection::CollectionHandle;

/// A collection or an item found by [`CollectionStore::discover`].
///
/// [`CollectionStore::discover`]: super::CollectionStore::discover
#[derive(Debug, Clone)]
pub enum DavNode {
    /// A collection.
    Collection(CollectionHandle),
    /// An item together with the collection owning it.
    Item {
        /// Owning collection.
        collection: CollectionHandle,
        /// The item.
        item: Item,
    },
}

impl DavNode {
    /// The collection handle, if this node is a collection.
    pub fn as_collection(&self) -> Option<&CollectionHandle> {
        match self {
            Self::Collection(handle) => Some(handle),
            Self::Item { .. } => None,
        }
    }

    /// The item, if this node is an item.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Collection(_) => None,
            Self::Item { item, .. } => Some(item),
        }
    }
}
