//! TTL-cached credential decisions.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use davstore_cache::{CacheManager, keys};
use davstore_core::config::AuthConfig;
use davstore_core::result::AppResult;
use davstore_core::traits::{CacheProvider, CredentialVerifier};

/// Cache marker for a rejected pair.
const REJECTED: &str = "";

/// Fronts a [`CredentialVerifier`] with a short-lived decision cache so that
/// repeated requests with the same credentials reach the authority at most
/// once per TTL. Both acceptances and rejections are cached; transport
/// errors are not.
#[derive(Debug, Clone)]
pub struct CachedAuthenticator {
    verifier: Arc<dyn CredentialVerifier>,
    cache: CacheManager,
    ttl: Duration,
}

impl CachedAuthenticator {
    /// Create an authenticator.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, cache: CacheManager, config: &AuthConfig) -> Self {
        Self {
            verifier,
            cache,
            ttl: Duration::from_secs(config.cache_ttl_seconds),
        }
    }

    /// Return the identifier when the pair is valid, `None` otherwise.
    pub async fn login(&self, login: &str, secret: &str) -> AppResult<Option<String>> {
        let key = keys::credential(login, &secret_digest(secret));
        if let Some(cached) = self.cache.get(&key).await? {
            debug!(login, "Credential decision served from cache");
            return Ok(Some(cached).filter(|v| v != REJECTED));
        }

        let decision = self.verifier.verify(login, secret).await?;
        self.cache
            .set(&key, decision.as_deref().unwrap_or(REJECTED), self.ttl)
            .await?;
        Ok(decision)
    }
}

fn secret_digest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use davstore_core::config::CacheConfig;

    #[derive(Debug, Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialVerifier for CountingVerifier {
        async fn verify(&self, login: &str, secret: &str) -> AppResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((secret == "right").then(|| login.to_string()))
        }
    }

    fn authenticator(verifier: Arc<CountingVerifier>) -> CachedAuthenticator {
        let cache = CacheManager::new(&CacheConfig {
            max_capacity: 100,
            default_ttl_seconds: 60,
        });
        CachedAuthenticator::new(verifier, cache, &AuthConfig::default())
    }

    #[tokio::test]
    async fn test_decisions_are_cached_per_secret() {
        let verifier = Arc::new(CountingVerifier::default());
        let auth = authenticator(verifier.clone());

        assert_eq!(auth.login("a@x.io", "right").await.unwrap().as_deref(), Some("a@x.io"));
        assert_eq!(auth.login("a@x.io", "right").await.unwrap().as_deref(), Some("a@x.io"));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);

        assert_eq!(auth.login("a@x.io", "wrong").await.unwrap(), None);
        assert_eq!(auth.login("a@x.io", "wrong").await.unwrap(), None);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_secret_never_appears_in_key() {
        let key = keys::credential("a@x.io", &secret_digest("hunter2"));
        assert!(!key.contains("hunter2"));
        assert_eq!(key.len(), "davstore:auth:a@x.io:".len() + 64);
    }
}
