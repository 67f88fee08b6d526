//! Item history entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::item::etag::sha256_hex;

/// Version chain of one `(collection, href)` pair. Outlives the item itself:
/// an empty `etag` marks a tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemHistory {
    /// Row identifier.
    pub id: Uuid,
    /// Collection the href lives (or lived) in.
    pub collection_id: Uuid,
    /// When the chain last advanced (epoch ms).
    pub modified_at: i64,
    /// Href.
    pub name: String,
    /// Etag last observed, or empty for a deleted item.
    pub etag: String,
    /// Chained fingerprint of every observed version.
    pub history_etag: String,
}

impl ItemHistory {
    /// Whether the href currently has no live item.
    pub fn is_tombstone(&self) -> bool {
        self.etag.is_empty()
    }
}

/// Next link of a history chain: SHA-256 over `previous/etag`, where an
/// empty etag stands for "absent".
pub fn chain_history_etag(previous: &str, etag: &str) -> String {
    sha256_hex(format!("{previous}/{etag}").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_depends_on_both_links() {
        let a = chain_history_etag("seed", "\"x\"");
        let b = chain_history_etag("seed", "");
        let c = chain_history_etag("other", "\"x\"");
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, chain_history_etag("seed", "\"x\""));
    }
}
