//! Root and top-level collection bootstrap.
//!
//! Both steps tolerate concurrent startups: inserts that lose the race are
//! skipped and the winning row is read back.

use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use davstore_core::error::AppError;
use davstore_core::result::AppResult;
use davstore_entity::collection::{Collection, CollectionTag, NewCollection};
use davstore_entity::time::now_ms;

use crate::repositories::CollectionRepository;

/// Return the root collection, creating it on first use.
pub async fn ensure_root(conn: &mut PgConnection, domain_id: i32) -> AppResult<Collection> {
    if CollectionRepository::create_root_if_absent(&mut *conn, Uuid::new_v4(), domain_id, now_ms())
        .await?
    {
        info!("Created root collection");
    }
    CollectionRepository::find_root(conn)
        .await?
        .ok_or_else(|| AppError::internal("Root collection missing after bootstrap"))
}

/// Make sure each named collection exists directly below `root`.
pub async fn ensure_children(
    conn: &mut PgConnection,
    root: &Collection,
    names: &[String],
) -> AppResult<Vec<Collection>> {
    let mut children = Vec::with_capacity(names.len());
    for name in names {
        let data = NewCollection {
            id: Uuid::new_v4(),
            parent_id: Some(root.id),
            domain_id: root.domain_id,
            name: Some(name.clone()),
            tag: CollectionTag::None,
        };
        if CollectionRepository::create_if_absent(&mut *conn, &data, now_ms()).await? {
            info!(name = %name, "Created bootstrap collection");
        }
        let child = CollectionRepository::find_child(&mut *conn, root.id, name)
            .await?
            .ok_or_else(|| AppError::internal(format!("Bootstrap collection {name} missing")))?;
        children.push(child);
    }
    Ok(children)
}
