//! Resolves slash-delimited paths against the collection tree.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use davstore_core::error::AppError;
use davstore_core::result::AppResult;
use davstore_database::repositories::{ItemRepository, TreeRepository};
use davstore_entity::item::Item;
use davstore_entity::node::{Depth, NodeRow};

/// Outcome of resolving a non-root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No node at the path.
    NotFound,
    /// The path names an item.
    Item {
        /// Owning collection.
        collection_id: Uuid,
        /// Path of the owning collection, without surrounding slashes.
        collection_path: String,
        /// The item row.
        item: Item,
    },
    /// The path names a collection.
    Collection {
        /// The collection node.
        node: NodeRow,
        /// Path without surrounding slashes.
        path: String,
        /// Direct child collections as `(id, path)`; empty at depth zero.
        children: Vec<(Uuid, String)>,
        /// Items of the collection; empty at depth zero.
        items: Vec<Item>,
    },
}

/// Walks path segments with one N-join query per lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeResolver;

impl TreeResolver {
    /// Resolve `segments` (outermost first, at least one).
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        segments: &[&str],
        depth: Depth,
    ) -> AppResult<Resolution> {
        let Some(node) = TreeRepository::resolve(&mut *conn, segments).await? else {
            debug!(path = %segments.join("/"), "Path not found");
            return Ok(Resolution::NotFound);
        };

        let path = segments.join("/");
        if !node.is_collection() {
            let (collection_id, href) = match (node.parent_id, node.name.as_deref()) {
                (Some(parent), Some(href)) => (parent, href),
                _ => return Err(AppError::internal(format!("Item node {} has no parent", node.id))),
            };
            let item = ItemRepository::find_by_href(conn, collection_id, href)
                .await?
                .ok_or_else(|| AppError::internal(format!("Item node {} vanished", node.id)))?;
            let collection_path = segments[..segments.len().saturating_sub(1)].join("/");
            return Ok(Resolution::Item {
                collection_id,
                collection_path,
                item,
            });
        }

        let mut children = Vec::new();
        let mut items = Vec::new();
        if depth.lists_children() {
            for child in TreeRepository::child_collections(&mut *conn, node.id).await? {
                let name = child.name.unwrap_or_default();
                children.push((child.id, format!("{path}/{name}")));
            }
            items = ItemRepository::find_by_collection(conn, node.id).await?;
        }

        Ok(Resolution::Collection {
            node,
            path,
            children,
            items,
        })
    }
}
