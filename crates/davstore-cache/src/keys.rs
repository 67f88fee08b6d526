//! Cache key builders for all davstore cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all davstore cache keys.
const PREFIX: &str = "davstore";

/// Cache key for the metadata map of a collection.
pub fn collection_metadata(collection_id: Uuid) -> String {
    format!("{PREFIX}:meta:{collection_id}")
}

/// Cache key for a credential decision. `secret_digest` must already be a
/// hash of the secret; raw secrets never appear in keys.
pub fn credential(login: &str, secret_digest: &str) -> String {
    format!("{PREFIX}:auth:{}:{secret_digest}", login.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_key() {
        assert_eq!(
            collection_metadata(Uuid::nil()),
            "davstore:meta:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_credential_key_lowercases_login() {
        assert_eq!(
            credential("Alice@Example.com", "abc"),
            "davstore:auth:alice@example.com:abc"
        );
    }
}
