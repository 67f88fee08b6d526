//! Collection metadata repository implementation.

use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::collection::{CollectionMetadata, Metadata};

use crate::error::db_error;

/// Repository for `collection_metadata` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataRepository;

impl MetadataRepository {
    /// All metadata rows of a collection, ordered by key.
    pub async fn find_by_collection(
        conn: &mut PgConnection,
        collection_id: Uuid,
    ) -> AppResult<Vec<CollectionMetadata>> {
        sqlx::query_as::<_, CollectionMetadata>(
            "SELECT collection_id, key, value FROM cas.collection_metadata \
             WHERE collection_id = $1 ORDER BY key ASC",
        )
        .bind(collection_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to load collection metadata"))
    }

    /// Delete every metadata row of a collection.
    pub async fn delete_by_collection(
        conn: &mut PgConnection,
        collection_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cas.collection_metadata WHERE collection_id = $1")
            .bind(collection_id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete collection metadata"))?;
        Ok(result.rows_affected())
    }

    /// Insert rows for every property. No-op for an empty map.
    pub async fn insert_all(
        conn: &mut PgConnection,
        collection_id: Uuid,
        props: &Metadata,
    ) -> AppResult<()> {
        if props.is_empty() {
            return Ok(());
        }
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO cas.collection_metadata (collection_id, key, value) ");
        qb.push_values(props, |mut row, (key, value)| {
            row.push_bind(collection_id)
                .push_bind(key.as_str())
                .push_bind(value.as_str());
        });
        qb.build()
            .execute(conn)
            .await
            .map_err(db_error("Failed to insert collection metadata"))?;
        Ok(())
    }

    /// Replace the metadata of a collection wholesale.
    pub async fn replace(
        conn: &mut PgConnection,
        collection_id: Uuid,
        props: &Metadata,
    ) -> AppResult<()> {
        Self::delete_by_collection(&mut *conn, collection_id).await?;
        Self::insert_all(conn, collection_id, props).await
    }
}
