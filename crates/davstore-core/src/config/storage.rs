//! Collection store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the collection tree, history retention and sync snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Domain identifier stamped on every created collection.
    #[serde(default = "default_domain_id")]
    pub domain_id: i32,
    /// Age after which tombstones and sync snapshots may be purged.
    #[serde(default = "default_max_sync_token_age")]
    pub max_sync_token_age_seconds: u64,
    /// How long collection metadata is served from cache before re-querying.
    #[serde(default = "default_metadata_cache_ttl")]
    pub metadata_cache_ttl_seconds: u64,
    /// Collections that must exist directly below the root.
    #[serde(default = "default_bootstrap_collections")]
    pub bootstrap_collections: Vec<String>,
    /// Interval between retention sweeps run by the server.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_seconds: u64,
}

impl StorageConfig {
    /// Retention window as a [`Duration`].
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.max_sync_token_age_seconds)
    }

    /// Metadata freshness window as a [`Duration`].
    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_cache_ttl_seconds)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            domain_id: default_domain_id(),
            max_sync_token_age_seconds: default_max_sync_token_age(),
            metadata_cache_ttl_seconds: default_metadata_cache_ttl(),
            bootstrap_collections: default_bootstrap_collections(),
            purge_interval_seconds: default_purge_interval(),
        }
    }
}

fn default_domain_id() -> i32 {
    1
}

fn default_max_sync_token_age() -> u64 {
    30 * 24 * 60 * 60
}

fn default_metadata_cache_ttl() -> u64 {
    5 * 60
}

fn default_bootstrap_collections() -> Vec<String> {
    vec!["domain".to_string()]
}

fn default_purge_interval() -> u64 {
    3600
}
