//! Content fingerprints.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// An HTTP entity tag: the quoted SHA-256 of an item's payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Etag(String);

impl Etag {
    /// Fingerprint a payload.
    pub fn of(data: &[u8]) -> Self {
        Self(format!("\"{}\"", sha256_hex(data)))
    }

    /// The quoted form, as stored in `item_history.etag`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest without quotes.
    pub fn unquoted(&self) -> &str {
        self.0.trim_matches('"')
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_sha256() {
        let etag = Etag::of(b"");
        assert_eq!(
            etag.as_str(),
            "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
        );
        assert_eq!(etag.unquoted().len(), 64);
    }
}
