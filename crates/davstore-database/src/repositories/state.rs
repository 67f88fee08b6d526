//! Collection state (sync snapshot) repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::sync::CollectionState;

use crate::error::db_error;

/// Repository for `collection_state` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateRepository;

impl StateRepository {
    /// Find a snapshot by token name.
    pub async fn find(
        conn: &mut PgConnection,
        collection_id: Uuid,
        name: &str,
    ) -> AppResult<Option<CollectionState>> {
        sqlx::query_as::<_, CollectionState>(
            "SELECT * FROM cas.collection_state WHERE collection_id = $1 AND name = $2",
        )
        .bind(collection_id)
        .bind(name)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to load collection state"))
    }

    /// Store a snapshot unless one with the same name exists. Returns
    /// whether a row was written.
    pub async fn create_if_absent(
        conn: &mut PgConnection,
        collection_id: Uuid,
        name: &str,
        state: &[u8],
        now: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO cas.collection_state (collection_id, name, state, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (collection_id, name) DO NOTHING",
        )
        .bind(collection_id)
        .bind(name)
        .bind(state)
        .bind(now)
        .execute(conn)
        .await
        .map_err(db_error("Failed to store collection state"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete snapshots of a collection created before `cutoff`.
    pub async fn purge_older_than(
        conn: &mut PgConnection,
        collection_id: Uuid,
        cutoff: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM cas.collection_state WHERE collection_id = $1 AND created_at < $2",
        )
        .bind(collection_id)
        .bind(cutoff)
        .execute(conn)
        .await
        .map_err(db_error("Failed to purge collection states"))?;
        Ok(result.rows_affected())
    }
}
