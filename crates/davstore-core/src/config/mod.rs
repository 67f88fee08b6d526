//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Deserialized from `config/default.toml`, the file passed to
/// [`AppConfig::load`] and `DAVSTORE__`-prefixed environment variables,
/// in that order of precedence (last wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Collection store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// In-memory cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Credential check settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("DAVSTORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database": { "url": "postgres://localhost/davstore" }
        }))
        .unwrap();

        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.storage.max_sync_token_age_seconds, 2_592_000);
        assert_eq!(config.storage.metadata_cache_ttl_seconds, 300);
        assert_eq!(config.storage.bootstrap_collections, vec!["domain".to_string()]);
        assert_eq!(config.auth.cache_ttl_seconds, 60);
        assert_eq!(config.logging.level, "info");
    }
}
