//! Collection entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::collection::tag::CollectionTag;
use crate::time::http_date;

/// A node of the collection tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Collection {
    /// Unique collection identifier.
    pub id: Uuid,
    /// Parent collection (null only for the root).
    pub parent_id: Option<Uuid>,
    /// Domain the collection belongs to.
    pub domain_id: i32,
    /// Last time the collection or anything in it changed (epoch ms).
    pub modified_at: i64,
    /// Name, unique among siblings (null only for the root).
    pub name: Option<String>,
    /// Raw tag column; see [`Collection::tag`].
    pub tag: Option<i16>,
}

impl Collection {
    /// Check if this is the root collection.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Decoded collection tag.
    pub fn tag(&self) -> CollectionTag {
        CollectionTag::from_column(self.tag)
    }

    /// Modification time as an HTTP date.
    pub fn last_modified(&self) -> String {
        http_date(self.modified_at)
    }
}

/// Data required to insert a collection row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollection {
    /// Identifier to insert with.
    pub id: Uuid,
    /// Parent collection (None only when creating the root).
    pub parent_id: Option<Uuid>,
    /// Domain identifier.
    pub domain_id: i32,
    /// Collection name (None only for the root).
    pub name: Option<String>,
    /// Collection tag.
    pub tag: CollectionTag,
}
