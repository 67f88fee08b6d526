//! Unified collection/item rows produced by path resolution.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use davstore_core::error::AppError;
use davstore_core::result::AppResult;

/// Discriminator values of [`NodeRow::kind`].
pub const KIND_COLLECTION: &str = "collection";
pub const KIND_ITEM: &str = "item";

/// A row of the collection ∪ item view used for path walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NodeRow {
    /// Collection or item id.
    pub id: Uuid,
    /// Parent collection (owning collection for items).
    pub parent_id: Option<Uuid>,
    /// Modification time (epoch ms).
    pub modified_at: i64,
    /// Name / href.
    pub name: Option<String>,
    /// Item payload; null for collections.
    pub data: Option<Vec<u8>>,
    /// Either [`KIND_COLLECTION`] or [`KIND_ITEM`].
    pub kind: String,
}

impl NodeRow {
    /// Whether the row is a collection.
    pub fn is_collection(&self) -> bool {
        self.kind == KIND_COLLECTION
    }
}

/// How far below a resolved collection a lookup lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    /// Only the resolved node.
    Zero,
    /// The node plus its direct children.
    One,
    /// Treated like [`Depth::One`]: listings never recurse further.
    Infinity,
}

impl Depth {
    /// Parse a `Depth` header value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" => Ok(Self::Zero),
            "1" => Ok(Self::One),
            "infinity" => Ok(Self::Infinity),
            other => Err(AppError::validation(format!("Invalid depth: {other}"))),
        }
    }

    /// Whether children should be listed.
    pub fn lists_children(self) -> bool {
        self != Self::Zero
    }
}

/// Split a slash-delimited path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/"), Vec::<&str>::new());
        assert_eq!(split_path("/alice/"), vec!["alice"]);
        assert_eq!(split_path("alice/book/x.vcf"), vec!["alice", "book", "x.vcf"]);
        assert_eq!(split_path("//alice//book/"), vec!["alice", "book"]);
    }

    #[test]
    fn test_depth_parse() {
        assert_eq!(Depth::parse("0").unwrap(), Depth::Zero);
        assert_eq!(Depth::parse("Infinity").unwrap(), Depth::Infinity);
        assert!(Depth::parse("2").is_err());
        assert!(!Depth::Zero.lists_children());
        assert!(Depth::One.lists_children());
    }
}
