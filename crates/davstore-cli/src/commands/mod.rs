//! CLI command definitions and dispatch.

pub mod auth;
pub mod collection;
pub mod item;
pub mod migrate;
pub mod purge;
pub mod sync;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use davstore_cache::CacheManager;
use davstore_core::config::AppConfig;
use davstore_core::error::AppError;
use davstore_database::DatabasePool;
use davstore_service::{CollectionHandle, CollectionStore, VObjectParser};

/// davstore: contact and calendar collection store administration
#[derive(Debug, Parser)]
#[command(name = "davstore", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Collection management
    Collection(collection::CollectionArgs),
    /// Item management
    Item(item::ItemArgs),
    /// Compute a sync token and change set
    Sync(sync::SyncArgs),
    /// Apply the retention window
    Purge(purge::PurgeArgs),
    /// Credential and rights checks
    Auth(auth::AuthArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Collection(args) => collection::execute(args, &self.config, self.format).await,
            Commands::Item(args) => item::execute(args, &self.config, self.format).await,
            Commands::Sync(args) => sync::execute(args, &self.config, self.format).await,
            Commands::Purge(args) => purge::execute(args, &self.config, self.format).await,
            Commands::Auth(args) => auth::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect to the database
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: open the collection store
pub async fn open_store(config: &AppConfig) -> Result<CollectionStore, AppError> {
    let db = connect(config).await?;
    let cache = CacheManager::new(&config.cache);
    CollectionStore::open(db, config.storage.clone(), cache, Arc::new(VObjectParser::new())).await
}

/// Helper: resolve a collection path or fail with not-found
pub async fn require_collection(
    store: &CollectionStore,
    path: &str,
) -> Result<CollectionHandle, AppError> {
    store
        .collection_at(path)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Collection {path} not found")))
}

/// Helper: ask before a destructive action unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
