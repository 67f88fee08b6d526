//! Credential verification trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Checks an identifier/secret pair against an authority.
///
/// Returns the canonical identifier on success and `None` when the pair is
/// rejected. Transport failures are errors, not rejections.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Verify a login and secret.
    async fn verify(&self, login: &str, secret: &str) -> AppResult<Option<String>>;
}
