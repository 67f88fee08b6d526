//! Shared helpers for the store integration tests.
//!
//! Tests need a PostgreSQL database reachable through `DATABASE_URL`; when
//! it is unset they return early without asserting anything.

#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use davstore_cache::CacheManager;
use davstore_core::config::{CacheConfig, DatabaseConfig, StorageConfig};
use davstore_database::DatabasePool;
use davstore_database::migration::run_migrations;
use davstore_database::repositories::HistoryRepository;
use davstore_service::{CollectionHandle, CollectionStore, VObjectParser};

/// A store opened against the test database, plus the pool for direct
/// queries.
pub struct TestStore {
    pub store: CollectionStore,
    pub db: DatabasePool,
}

impl TestStore {
    /// Open a store with default storage settings.
    pub async fn new() -> Option<Self> {
        Self::with_config(StorageConfig::default()).await
    }

    /// Open a store with the given storage settings.
    pub async fn with_config(config: StorageConfig) -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let db = DatabasePool::connect(&DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 60,
        })
        .await
        .expect("Failed to connect to test database");

        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let cache = CacheManager::new(&CacheConfig::default());
        let store = CollectionStore::open(db.clone(), config, cache, Arc::new(VObjectParser::new()))
            .await
            .expect("Failed to open store");
        Some(Self { store, db })
    }

    /// Create a fresh top-level collection no other test touches.
    pub async fn scratch(&self) -> CollectionHandle {
        let name = format!("test-{}", Uuid::new_v4().simple());
        self.store
            .create_collection(&format!("/{name}/"), None, None)
            .await
            .expect("Failed to create scratch collection")
    }

    /// Current history etag of `href`, if it has ever been written.
    pub async fn history_etag(&self, collection: &CollectionHandle, href: &str) -> Option<String> {
        let mut conn = self.db.pool().acquire().await.expect("Failed to acquire connection");
        HistoryRepository::find(&mut *conn, collection.id(), href)
            .await
            .expect("Failed to read history")
            .map(|row| row.history_etag)
    }
}

/// A minimal vCard.
pub fn vcard(uid: &str, full_name: &str) -> String {
    format!(
        "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:{uid}\r\nFN:{full_name}\r\nN:{full_name};;;;\r\nEND:VCARD\r\n"
    )
}

/// A minimal single-event iCalendar object.
pub fn vevent(uid: &str, summary: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//davstore//test//EN\r\nBEGIN:VEVENT\r\n\
         UID:{uid}\r\nDTSTAMP:20250101T000000Z\r\nSUMMARY:{summary}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
    )
}

/// A vCard href with a fresh UUID stem.
pub fn vcard_href() -> String {
    format!("{}.vcf", Uuid::new_v4())
}
