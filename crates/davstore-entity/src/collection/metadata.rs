//! Collection metadata rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Key/value properties of one collection.
pub type Metadata = BTreeMap<String, String>;

/// A single metadata row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CollectionMetadata {
    /// Owning collection.
    pub collection_id: Uuid,
    /// Property key, unique per collection.
    pub key: String,
    /// Property value.
    pub value: Option<String>,
}

/// Collapse metadata rows into a map. Null values become empty strings.
pub fn rows_to_metadata(rows: Vec<CollectionMetadata>) -> Metadata {
    rows.into_iter()
        .map(|row| (row.key, row.value.unwrap_or_default()))
        .collect()
}
