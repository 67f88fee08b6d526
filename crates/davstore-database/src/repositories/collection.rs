//! Collection repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::collection::{Collection, CollectionTag, NewCollection};

use crate::error::db_error;

/// Repository for collection rows and parent/child lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionRepository;

impl CollectionRepository {
    /// Find a collection by ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>("SELECT * FROM cas.collection WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find collection"))
    }

    /// Find the root collection.
    pub async fn find_root(conn: &mut PgConnection) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>("SELECT * FROM cas.collection WHERE parent_id IS NULL")
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find root collection"))
    }

    /// Find a direct child of `parent_id` by name.
    pub async fn find_child(
        conn: &mut PgConnection,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(
            "SELECT * FROM cas.collection WHERE parent_id = $1 AND name = $2",
        )
        .bind(parent_id)
        .bind(name)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to find child collection"))
    }

    /// IDs of every collection, root included.
    pub async fn list_ids(conn: &mut PgConnection) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM cas.collection ORDER BY modified_at ASC")
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list collections"))
    }

    /// Create a new collection.
    pub async fn create(
        conn: &mut PgConnection,
        data: &NewCollection,
        now: i64,
    ) -> AppResult<Collection> {
        sqlx::query_as::<_, Collection>(
            "INSERT INTO cas.collection (id, parent_id, domain_id, modified_at, name, tag) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.id)
        .bind(data.parent_id)
        .bind(data.domain_id)
        .bind(now)
        .bind(&data.name)
        .bind(data.tag.to_column())
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create collection"))
    }

    /// Insert the root unless one already exists. Safe to race: the partial
    /// unique index on `parent_id IS NULL` lets only one insert win.
    pub async fn create_root_if_absent(
        conn: &mut PgConnection,
        id: Uuid,
        domain_id: i32,
        now: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO cas.collection (id, parent_id, domain_id, modified_at, name, tag) \
             VALUES ($1, NULL, $2, $3, NULL, NULL) \
             ON CONFLICT ((parent_id IS NULL)) WHERE parent_id IS NULL DO NOTHING",
        )
        .bind(id)
        .bind(domain_id)
        .bind(now)
        .execute(conn)
        .await
        .map_err(db_error("Failed to create root collection"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a collection unless its parent already has a child of that
    /// name. Returns whether a row was written.
    pub async fn create_if_absent(
        conn: &mut PgConnection,
        data: &NewCollection,
        now: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO cas.collection (id, parent_id, domain_id, modified_at, name, tag) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (parent_id, name) DO NOTHING",
        )
        .bind(data.id)
        .bind(data.parent_id)
        .bind(data.domain_id)
        .bind(now)
        .bind(&data.name)
        .bind(data.tag.to_column())
        .execute(conn)
        .await
        .map_err(db_error("Failed to create collection"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a collection's tag.
    pub async fn set_tag(conn: &mut PgConnection, id: Uuid, tag: CollectionTag) -> AppResult<()> {
        sqlx::query("UPDATE cas.collection SET tag = $2 WHERE id = $1")
            .bind(id)
            .bind(tag.to_column())
            .execute(conn)
            .await
            .map_err(db_error("Failed to update collection tag"))?;
        Ok(())
    }

    /// Bump `modified_at`. Returns whether the collection exists.
    pub async fn touch(conn: &mut PgConnection, id: Uuid, now: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE cas.collection SET modified_at = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(conn)
            .await
            .map_err(db_error("Failed to touch collection"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a collection (cascades to children, metadata, items, history
    /// and snapshots).
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cas.collection WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete collection"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every direct child of a collection.
    pub async fn delete_children(conn: &mut PgConnection, parent_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cas.collection WHERE parent_id = $1")
            .bind(parent_id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete child collections"))?;
        Ok(result.rows_affected())
    }
}
