//! History etag maintenance and retention.

use std::ops::AddAssign;
use std::time::Duration;

use serde::Serialize;
use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_database::repositories::{HistoryRepository, StateRepository};
use davstore_entity::history::{ItemHistory, chain_history_etag};
use davstore_entity::item::Etag;
use davstore_entity::time::now_ms;

/// Rows removed by a retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeStats {
    /// Tombstoned history rows deleted.
    pub tombstones: u64,
    /// Sync snapshots deleted.
    pub snapshots: u64,
}

impl AddAssign for PurgeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.tombstones += rhs.tombstones;
        self.snapshots += rhs.snapshots;
    }
}

/// Keeps the `(collection, href) -> history_etag` chain current.
#[derive(Debug, Clone, Copy)]
pub struct VersionTracker {
    retention: Duration,
}

impl VersionTracker {
    /// Tracker whose purge drops rows older than `retention`.
    pub fn new(retention: Duration) -> Self {
        Self { retention }
    }

    /// Record that `name` now has `etag` (`None` when absent) and return its
    /// history etag. Unchanged etags leave the chain untouched.
    pub async fn advance(
        &self,
        conn: &mut PgConnection,
        collection_id: Uuid,
        name: &str,
        etag: Option<&Etag>,
    ) -> AppResult<String> {
        let current = etag.map(Etag::as_str).unwrap_or_default();

        match HistoryRepository::find(&mut *conn, collection_id, name).await? {
            Some(row) if row.etag == current => Ok(row.history_etag),
            Some(row) => {
                let next = chain_history_etag(&row.history_etag, current);
                HistoryRepository::update(conn, collection_id, name, current, &next, now_ms())
                    .await?;
                debug!(collection_id = %collection_id, href = name, tombstone = etag.is_none(), "History advanced");
                Ok(next)
            }
            None => {
                let seed = Uuid::new_v4().simple().to_string();
                if current.is_empty() {
                    // Never seen and still absent.
                    return Ok(seed);
                }
                let next = chain_history_etag(&seed, current);
                let row = ItemHistory {
                    id: Uuid::new_v4(),
                    collection_id,
                    modified_at: now_ms(),
                    name: name.to_string(),
                    etag: current.to_string(),
                    history_etag: next.clone(),
                };
                HistoryRepository::create(conn, &row).await?;
                debug!(collection_id = %collection_id, href = name, "History started");
                Ok(next)
            }
        }
    }

    /// Hrefs with history but no live item.
    pub async fn tombstones(&self, conn: &mut PgConnection, collection_id: Uuid) -> AppResult<Vec<String>> {
        HistoryRepository::find_tombstones(conn, collection_id).await
    }

    /// Delete tombstones and snapshots of one collection older than the
    /// retention window.
    pub async fn purge(&self, conn: &mut PgConnection, collection_id: Uuid) -> AppResult<PurgeStats> {
        let cutoff = now_ms().saturating_sub(i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX));
        let tombstones = HistoryRepository::purge_tombstones(&mut *conn, collection_id, cutoff).await?;
        let snapshots = StateRepository::purge_older_than(conn, collection_id, cutoff).await?;
        Ok(PurgeStats {
            tombstones,
            snapshots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_stats_accumulate() {
        let mut total = PurgeStats::default();
        total += PurgeStats {
            tombstones: 2,
            snapshots: 1,
        };
        total += PurgeStats {
            tombstones: 3,
            snapshots: 0,
        };
        assert_eq!(
            total,
            PurgeStats {
                tombstones: 5,
                snapshots: 1
            }
        );
    }
}
