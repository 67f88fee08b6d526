//! Item history repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::history::ItemHistory;

use crate::error::db_error;

/// Repository for `item_history` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryRepository;

impl HistoryRepository {
    /// Find the history row of `(collection_id, name)`.
    pub async fn find(
        conn: &mut PgConnection,
        collection_id: Uuid,
        name: &str,
    ) -> AppResult<Option<ItemHistory>> {
        sqlx::query_as::<_, ItemHistory>(
            "SELECT * FROM cas.item_history WHERE collection_id = $1 AND name = $2",
        )
        .bind(collection_id)
        .bind(name)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to find item history"))
    }

    /// Start a new chain.
    pub async fn create(conn: &mut PgConnection, row: &ItemHistory) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO cas.item_history (id, collection_id, modified_at, name, etag, history_etag) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.id)
        .bind(row.collection_id)
        .bind(row.modified_at)
        .bind(&row.name)
        .bind(&row.etag)
        .bind(&row.history_etag)
        .execute(conn)
        .await
        .map_err(db_error("Failed to create item history"))?;
        Ok(())
    }

    /// Advance an existing chain.
    pub async fn update(
        conn: &mut PgConnection,
        collection_id: Uuid,
        name: &str,
        etag: &str,
        history_etag: &str,
        now: i64,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE cas.item_history SET etag = $3, history_etag = $4, modified_at = $5 \
             WHERE collection_id = $1 AND name = $2",
        )
        .bind(collection_id)
        .bind(name)
        .bind(etag)
        .bind(history_etag)
        .bind(now)
        .execute(conn)
        .await
        .map_err(db_error("Failed to update item history"))?;
        Ok(())
    }

    /// Names with a history row but no live item.
    pub async fn find_tombstones(
        conn: &mut PgConnection,
        collection_id: Uuid,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT h.name FROM cas.item_history h \
             LEFT JOIN cas.item i ON i.collection_id = h.collection_id AND i.name = h.name \
             WHERE h.collection_id = $1 AND i.id IS NULL \
             ORDER BY h.name ASC",
        )
        .bind(collection_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list tombstones"))
    }

    /// Delete tombstones of a collection that last advanced before `cutoff`.
    pub async fn purge_tombstones(
        conn: &mut PgConnection,
        collection_id: Uuid,
        cutoff: i64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM cas.item_history h \
             WHERE h.collection_id = $1 AND h.modified_at < $2 \
             AND NOT EXISTS ( \
                 SELECT 1 FROM cas.item i WHERE i.collection_id = h.collection_id AND i.name = h.name \
             )",
        )
        .bind(collection_id)
        .bind(cutoff)
        .execute(conn)
        .await
        .map_err(db_error("Failed to purge tombstones"))?;
        Ok(result.rows_affected())
    }
}
