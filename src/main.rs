//! davstore server
//!
//! Opens the collection store and keeps its retention window applied until
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use davstore_cache::CacheManager;
use davstore_core::config::AppConfig;
use davstore_core::error::AppError;
use davstore_database::DatabasePool;
use davstore_database::migration::run_migrations;
use davstore_service::{CollectionStore, VObjectParser};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("DAVSTORE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting davstore");

    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let cache = CacheManager::new(&config.cache);
    let store = CollectionStore::open(
        db.clone(),
        config.storage.clone(),
        cache,
        Arc::new(VObjectParser::new()),
    )
    .await?;
    if !store.verify().await? {
        return Err(AppError::internal("Store verification failed after bootstrap"));
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interval = Duration::from_secs(config.storage.purge_interval_seconds.max(1));
    let sweeper = tokio::spawn(retention_loop(store, interval, shutdown_rx));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Retention task ended abnormally");
    }

    db.close().await;
    tracing::info!("davstore stopped");
    Ok(())
}

/// Run `purge_all` every `interval` until `shutdown` flips.
async fn retention_loop(store: CollectionStore, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(interval_seconds = interval.as_secs(), "Retention sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = store.purge_all().await {
                    tracing::error!(error = %e, "Retention sweep failed");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    tracing::info!("Retention sweeper stopped");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
