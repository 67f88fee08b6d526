//! Collection state snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use davstore_core::result::AppResult;

use crate::sync::token::SyncToken;

/// An immutable snapshot row keyed by `(collection_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CollectionState {
    /// Collection the snapshot describes.
    pub collection_id: Uuid,
    /// Token digest of the snapshot.
    pub name: String,
    /// Serialized [`SyncState`].
    pub state: Vec<u8>,
    /// When the snapshot was first stored (epoch ms).
    pub created_at: i64,
}

/// Mapping `href -> history_etag` observed at token computation time.
///
/// Backed by a `BTreeMap`, so iteration is always in href order and the
/// derived token does not depend on database enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState(BTreeMap<String, String>);

impl SyncState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a href. Returns `false` without overwriting when the href is
    /// already present.
    pub fn observe(&mut self, href: String, history_etag: String) -> bool {
        match self.0.entry(href) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(history_etag);
                true
            }
        }
    }

    /// Whether a href has been recorded.
    pub fn contains(&self, href: &str) -> bool {
        self.0.contains_key(href)
    }

    /// History etag recorded for a href.
    pub fn get(&self, href: &str) -> Option<&str> {
        self.0.get(href).map(String::as_str)
    }

    /// Number of hrefs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no hrefs were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Token summarizing this state.
    pub fn token(&self) -> SyncToken {
        SyncToken::digest(self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Hrefs whose history etag differs between `previous` and `self`,
    /// including hrefs present on only one side. Sorted by href.
    pub fn changes_since(&self, previous: &SyncState) -> Vec<String> {
        let mut changes: Vec<String> = self
            .0
            .iter()
            .filter(|(href, etag)| previous.get(href) != Some(etag.as_str()))
            .map(|(href, _)| href.clone())
            .collect();
        changes.extend(
            previous
                .0
                .keys()
                .filter(|href| !self.0.contains_key(*href))
                .cloned(),
        );
        changes.sort();
        changes
    }

    /// Serialize for the `collection_state.state` column.
    pub fn to_blob(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Deserialize from the `collection_state.state` column.
    pub fn from_blob(blob: &[u8]) -> AppResult<Self> {
        Ok(Self(serde_json::from_slice(blob)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, &str)]) -> SyncState {
        let mut s = SyncState::new();
        for (k, v) in pairs {
            s.observe(k.to_string(), v.to_string());
        }
        s
    }

    #[test]
    fn test_observe_keeps_first_value() {
        let mut s = SyncState::new();
        assert!(s.observe("a.vcf".into(), "live".into()));
        assert!(!s.observe("a.vcf".into(), "tombstone".into()));
        assert_eq!(s.get("a.vcf"), Some("live"));
    }

    #[test]
    fn test_changes_are_symmetric_difference() {
        let old = state(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let new = state(&[("a", "1"), ("b", "9"), ("d", "4")]);
        assert_eq!(new.changes_since(&old), vec!["b", "c", "d"]);
        assert!(new.changes_since(&new).is_empty());
    }

    #[test]
    fn test_token_independent_of_insertion_order() {
        let forward = state(&[("a", "1"), ("b", "2")]);
        let backward = state(&[("b", "2"), ("a", "1")]);
        assert_eq!(forward.token(), backward.token());
    }

    #[test]
    fn test_blob_roundtrip() {
        let s = state(&[("x.ics", "abc")]);
        let blob = s.to_blob().unwrap();
        assert_eq!(blob, br#"{"x.ics":"abc"}"#.to_vec());
        assert_eq!(SyncState::from_blob(&blob).unwrap(), s);
    }
}
