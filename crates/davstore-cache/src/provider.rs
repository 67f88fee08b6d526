//! Cache manager shared by the store and the credential checker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use davstore_core::config::CacheConfig;
use davstore_core::result::AppResult;
use davstore_core::traits::cache::CacheProvider;

use crate::memory::MemoryCacheProvider;

/// Cache manager that wraps a cache provider behind a cheap clone.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider.
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create an in-memory cache manager from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            max_capacity = config.max_capacity,
            "Initializing in-memory cache provider"
        );
        Self {
            inner: Arc::new(MemoryCacheProvider::new(config)),
        }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set_default(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.inner.flush_all().await
    }
}
