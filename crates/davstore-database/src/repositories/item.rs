//! Item repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::item::{Item, UpsertItem};

use crate::error::db_error;

/// Repository for item rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRepository;

impl ItemRepository {
    /// Find an item by href.
    pub async fn find_by_href(
        conn: &mut PgConnection,
        collection_id: Uuid,
        href: &str,
    ) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM cas.item WHERE collection_id = $1 AND name = $2")
            .bind(collection_id)
            .bind(href)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find item"))
    }

    /// Find every item whose href is in `hrefs`.
    pub async fn find_by_hrefs(
        conn: &mut PgConnection,
        collection_id: Uuid,
        hrefs: &[String],
    ) -> AppResult<Vec<Item>> {
        if hrefs.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Item>(
            "SELECT * FROM cas.item WHERE collection_id = $1 AND name = ANY($2) ORDER BY name ASC",
        )
        .bind(collection_id)
        .bind(hrefs)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to find items"))
    }

    /// List all items of a collection.
    pub async fn find_by_collection(
        conn: &mut PgConnection,
        collection_id: Uuid,
    ) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM cas.item WHERE collection_id = $1 ORDER BY name ASC",
        )
        .bind(collection_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list items"))
    }

    /// Items whose raw payload contains `needle`.
    pub async fn find_containing(
        conn: &mut PgConnection,
        collection_id: Uuid,
        needle: &[u8],
    ) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM cas.item \
             WHERE collection_id = $1 AND position($2::bytea IN data) > 0 \
             ORDER BY name ASC",
        )
        .bind(collection_id)
        .bind(needle)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to search items"))
    }

    /// Whether an item exists at the href.
    pub async fn exists(conn: &mut PgConnection, collection_id: Uuid, href: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM cas.item WHERE collection_id = $1 AND name = $2)",
        )
        .bind(collection_id)
        .bind(href)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to check item"))
    }

    /// Whether any collection holds an item with this row id.
    pub async fn id_in_use(conn: &mut PgConnection, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM cas.item WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(db_error("Failed to check item id"))
    }

    /// Insert a new item.
    pub async fn create(conn: &mut PgConnection, data: &UpsertItem, now: i64) -> AppResult<()> {
        let fields = &data.fields;
        sqlx::query(
            "INSERT INTO cas.item (id, collection_id, modified_at, name, data, full_name, \
             prefix, suffix, first_name, last_name, middle_name, phone_number, ext_number, \
             company, title, department, categories) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(data.id)
        .bind(data.collection_id)
        .bind(now)
        .bind(&data.name)
        .bind(&data.data)
        .bind(&fields.full_name)
        .bind(&fields.prefix)
        .bind(&fields.suffix)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.middle_name)
        .bind(&fields.phone_number)
        .bind(&fields.ext_number)
        .bind(&fields.company)
        .bind(&fields.title)
        .bind(&fields.department)
        .bind(&fields.categories)
        .execute(conn)
        .await
        .map_err(db_error("Failed to create item"))?;
        Ok(())
    }

    /// Overwrite payload and search columns of the item at `data.name`.
    /// The row keeps its id. Returns whether a row was updated.
    pub async fn update(conn: &mut PgConnection, data: &UpsertItem, now: i64) -> AppResult<bool> {
        let fields = &data.fields;
        let result = sqlx::query(
            "UPDATE cas.item SET modified_at = $3, data = $4, full_name = $5, prefix = $6, \
             suffix = $7, first_name = $8, last_name = $9, middle_name = $10, \
             phone_number = $11, ext_number = $12, company = $13, title = $14, \
             department = $15, categories = $16 \
             WHERE collection_id = $1 AND name = $2",
        )
        .bind(data.collection_id)
        .bind(&data.name)
        .bind(now)
        .bind(&data.data)
        .bind(&fields.full_name)
        .bind(&fields.prefix)
        .bind(&fields.suffix)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.middle_name)
        .bind(&fields.phone_number)
        .bind(&fields.ext_number)
        .bind(&fields.company)
        .bind(&fields.title)
        .bind(&fields.department)
        .bind(&fields.categories)
        .execute(conn)
        .await
        .map_err(db_error("Failed to update item"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Move the item at `(from, from_href)` to `(to, to_href)`.
    pub async fn relocate(
        conn: &mut PgConnection,
        from: Uuid,
        from_href: &str,
        to: Uuid,
        to_href: &str,
        now: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE cas.item SET collection_id = $3, name = $4, modified_at = $5 \
             WHERE collection_id = $1 AND name = $2",
        )
        .bind(from)
        .bind(from_href)
        .bind(to)
        .bind(to_href)
        .bind(now)
        .execute(conn)
        .await
        .map_err(db_error("Failed to move item"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the item at an href.
    pub async fn delete(conn: &mut PgConnection, collection_id: Uuid, href: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cas.item WHERE collection_id = $1 AND name = $2")
            .bind(collection_id)
            .bind(href)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete item"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every item of a collection.
    pub async fn delete_by_collection(conn: &mut PgConnection, collection_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cas.item WHERE collection_id = $1")
            .bind(collection_id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete items"))?;
        Ok(result.rows_affected())
    }
}
