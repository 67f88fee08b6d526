//! Sync token parsing and formatting.

use std::fmt;

use sha2::{Digest, Sha256};

use davstore_core::error::AppError;
use davstore_core::result::AppResult;

/// URI prefix every sync token starts with.
pub const SYNC_TOKEN_PREFIX: &str = "http://davstore.dev/ns/sync/";

/// Length of the hex digest following the prefix.
const NAME_LEN: usize = 64;

/// Identifies one snapshot of a collection's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncToken {
    name: String,
}

impl SyncToken {
    /// Parse a caller-supplied token. An empty string means "no token".
    ///
    /// Anything else must be the prefix followed by exactly 64 lowercase
    /// hex characters.
    pub fn parse(token: &str) -> AppResult<Option<Self>> {
        if token.is_empty() {
            return Ok(None);
        }
        let name = token
            .strip_prefix(SYNC_TOKEN_PREFIX)
            .ok_or_else(|| AppError::validation(format!("Malformed token: {token}")))?;
        if !is_token_name(name) {
            return Err(AppError::validation(format!("Malformed token: {token}")));
        }
        Ok(Some(Self {
            name: name.to_string(),
        }))
    }

    /// Fold `(href, history_etag)` pairs into a token. Pairs must already be
    /// in a deterministic order.
    pub fn digest<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut hasher = Sha256::new();
        for (href, history_etag) in pairs {
            hasher.update(href.as_bytes());
            hasher.update(b"/");
            hasher.update(history_etag.as_bytes());
        }
        Self {
            name: format!("{:x}", hasher.finalize()),
        }
    }

    /// The hex digest, used as the snapshot key.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SYNC_TOKEN_PREFIX}{}", self.name)
    }
}

fn is_token_name(name: &str) -> bool {
    name.len() == NAME_LEN && name.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use davstore_core::error::ErrorKind;

    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_empty_means_no_token() {
        assert_eq!(SyncToken::parse("").unwrap(), None);
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let raw = format!("{SYNC_TOKEN_PREFIX}{EMPTY_DIGEST}");
        let token = SyncToken::parse(&raw).unwrap().unwrap();
        assert_eq!(token.name(), EMPTY_DIGEST);
        assert_eq!(token.to_string(), raw);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let cases = [
            format!("http://example.com/sync/{EMPTY_DIGEST}"),
            format!("{SYNC_TOKEN_PREFIX}{}", &EMPTY_DIGEST[..63]),
            format!("{SYNC_TOKEN_PREFIX}{EMPTY_DIGEST}0"),
            format!("{SYNC_TOKEN_PREFIX}{}", EMPTY_DIGEST.to_uppercase()),
            format!("{SYNC_TOKEN_PREFIX}{}g", &EMPTY_DIGEST[..63]),
            EMPTY_DIGEST.to_string(),
        ];
        for case in cases {
            let err = SyncToken::parse(&case).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "{case}");
        }
    }

    #[test]
    fn test_digest_of_nothing_is_empty_sha256() {
        assert_eq!(SyncToken::digest(std::iter::empty()).name(), EMPTY_DIGEST);
    }

    #[test]
    fn test_digest_concatenates_pairs() {
        let folded = SyncToken::digest([("a.vcf", "1"), ("b.vcf", "2")]);
        let joined = format!("{:x}", Sha256::digest(b"a.vcf/1b.vcf/2"));
        assert_eq!(folded.name(), joined);
    }
}
