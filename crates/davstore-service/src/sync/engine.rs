//! Sync token computation and snapshot diffing.

use serde::Serialize;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_database::repositories::{ItemRepository, StateRepository};
use davstore_entity::sync::{SyncState, SyncToken};
use davstore_entity::time::now_ms;

use crate::version::VersionTracker;

/// Result of a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Token describing the collection as of this call.
    pub token: String,
    /// Hrefs added, changed or removed since the caller's token, sorted.
    pub changes: Vec<String>,
}

/// Computes tokens over the full collection state and diffs snapshots.
#[derive(Debug, Clone, Copy)]
pub struct SyncEngine {
    tracker: VersionTracker,
}

impl SyncEngine {
    /// Engine reading history chains through `tracker`.
    pub fn new(tracker: VersionTracker) -> Self {
        Self { tracker }
    }

    /// Current state of a collection: every live href plus every tombstone,
    /// each mapped to its (re-confirmed) history etag.
    pub async fn current_state(
        &self,
        conn: &mut PgConnection,
        collection_id: Uuid,
    ) -> AppResult<SyncState> {
        let mut state = SyncState::new();

        let items = ItemRepository::find_by_collection(&mut *conn, collection_id).await?;
        for item in items {
            if state.contains(item.href()) {
                continue;
            }
            let history_etag = self
                .tracker
                .advance(&mut *conn, collection_id, item.href(), Some(&item.etag()))
                .await?;
            state.observe(item.name, history_etag);
        }

        for href in self.tracker.tombstones(&mut *conn, collection_id).await? {
            if state.contains(&href) {
                continue;
            }
            let history_etag = self.tracker.advance(&mut *conn, collection_id, &href, None).await?;
            state.observe(href, history_etag);
        }

        Ok(state)
    }

    /// Compute the token for `collection_id` and the hrefs that changed
    /// since `previous`.
    pub async fn sync(
        &self,
        conn: &mut PgConnection,
        collection_id: Uuid,
        previous: Option<&SyncToken>,
    ) -> AppResult<SyncOutcome> {
        let state = self.current_state(&mut *conn, collection_id).await?;
        let token = state.token();

        if previous == Some(&token) {
            debug!(collection_id = %collection_id, token = %token, "Collection unchanged");
            return Ok(SyncOutcome {
                token: token.to_string(),
                changes: Vec::new(),
            });
        }

        let old_state = match previous {
            Some(old) => match StateRepository::find(&mut *conn, collection_id, old.name()).await? {
                Some(row) => SyncState::from_blob(&row.state)?,
                None => {
                    debug!(collection_id = %collection_id, token = %old, "Unknown sync token, diffing against empty state");
                    SyncState::new()
                }
            },
            None => SyncState::new(),
        };

        let created = StateRepository::create_if_absent(
            &mut *conn,
            collection_id,
            token.name(),
            &state.to_blob()?,
            now_ms(),
        )
        .await?;

        let changes = state.changes_since(&old_state);
        info!(
            collection_id = %collection_id,
            token = %token,
            snapshot_created = created,
            changes = changes.len(),
            "Collection synced"
        );
        Ok(SyncOutcome {
            token: token.to_string(),
            changes,
        })
    }
}
