//! Store-wide operations: lookup, collection creation, move, retention.

use std::sync::Arc;

use sqlx::PgConnection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use davstore_cache::{CacheManager, keys};
use davstore_core::config::StorageConfig;
use davstore_core::error::AppError;
use davstore_core::result::AppResult;
use davstore_core::traits::CacheProvider;
use davstore_database::bootstrap;
use davstore_database::connection::{DatabasePool, commit};
use davstore_database::repositories::{CollectionRepository, ItemRepository, MetadataRepository};
use davstore_entity::collection::{Collection, CollectionTag, Metadata, NewCollection};
use davstore_entity::item::{Etag, HrefIdentity, Item, ItemKind, UpsertItem};
use davstore_entity::node::{Depth, split_path};
use davstore_entity::time::now_ms;

use crate::parser::ItemParser;
use crate::sync::SyncEngine;
use crate::tree::{Resolution, TreeResolver};
use crate::version::{PurgeStats, VersionTracker};

use super::collection::CollectionHandle;
use super::lock::{LockMode, StoreLock};
use super::node::DavNode;

/// Deepest collection path accepted by [`CollectionStore::create_collection`].
const MAX_COLLECTION_DEPTH: usize = 2;

pub(crate) struct StoreInner {
    pub(crate) db: DatabasePool,
    pub(crate) config: StorageConfig,
    pub(crate) cache: CacheManager,
    pub(crate) parser: Arc<dyn ItemParser>,
    pub(crate) root: Collection,
    pub(crate) resolver: TreeResolver,
    pub(crate) tracker: VersionTracker,
    pub(crate) sync: SyncEngine,
}

impl std::fmt::Debug for StoreInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreInner")
            .field("root", &self.root.id)
            .field("domain_id", &self.config.domain_id)
            .finish_non_exhaustive()
    }
}

/// Relational collection/item store.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    inner: Arc<StoreInner>,
}

impl CollectionStore {
    /// Open the store: ensure the root and bootstrap collections exist.
    pub async fn open(
        db: DatabasePool,
        config: StorageConfig,
        cache: CacheManager,
        parser: Arc<dyn ItemParser>,
    ) -> AppResult<Self> {
        let mut tx = db.begin().await?;
        let root = bootstrap::ensure_root(&mut tx, config.domain_id).await?;
        bootstrap::ensure_children(&mut tx, &root, &config.bootstrap_collections).await?;
        commit(tx).await?;

        info!(root_id = %root.id, "Collection store opened");
        let tracker = VersionTracker::new(config.retention());
        Ok(Self {
            inner: Arc::new(StoreInner {
                db,
                config,
                cache,
                parser,
                root,
                resolver: TreeResolver,
                tracker,
                sync: SyncEngine::new(tracker),
            }),
        })
    }

    pub(crate) fn inner(&self) -> &StoreInner {
        &self.inner
    }

    /// The root collection row.
    pub fn root(&self) -> &Collection {
        &self.inner.root
    }

    /// Handle on the root collection.
    pub fn root_handle(&self) -> CollectionHandle {
        CollectionHandle::new(self.clone(), self.inner.root.id, String::new())
    }

    /// Resolve `path`. Returns the node itself, followed by its child
    /// collections and items when `depth` lists children. An unknown path
    /// yields an empty vector.
    pub async fn discover(&self, path: &str, depth: Depth) -> AppResult<Vec<DavNode>> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Ok(vec![DavNode::Collection(self.root_handle())]);
        }

        let mut tx = self.inner.db.begin().await?;
        let resolution = self.inner.resolver.resolve(&mut tx, &segments, depth).await?;
        commit(tx).await?;

        let nodes = match resolution {
            Resolution::NotFound => Vec::new(),
            Resolution::Item {
                collection_id,
                collection_path,
                item,
            } => vec![DavNode::Item {
                collection: CollectionHandle::new(self.clone(), collection_id, collection_path),
                item,
            }],
            Resolution::Collection {
                node,
                path,
                children,
                items,
            } => {
                let handle = CollectionHandle::new(self.clone(), node.id, path);
                let mut nodes = Vec::with_capacity(1 + children.len() + items.len());
                nodes.push(DavNode::Collection(handle.clone()));
                nodes.extend(
                    children
                        .into_iter()
                        .map(|(id, path)| DavNode::Collection(CollectionHandle::new(self.clone(), id, path))),
                );
                nodes.extend(items.into_iter().map(|item| DavNode::Item {
                    collection: handle.clone(),
                    item,
                }));
                nodes
            }
        };
        debug!(path, found = nodes.len(), "Discovered");
        Ok(nodes)
    }

    /// Handle on the collection at `path`, if it exists.
    pub async fn collection_at(&self, path: &str) -> AppResult<Option<CollectionHandle>> {
        let nodes = self.discover(path, Depth::Zero).await?;
        Ok(nodes.into_iter().next().and_then(|node| match node {
            DavNode::Collection(handle) => Some(handle),
            DavNode::Item { .. } => None,
        }))
    }

    /// Walk `href` below the root, creating missing collections.
    ///
    /// At most two segments are accepted. A second segment that is not a
    /// UUID is replaced by a fresh one, which also becomes the collection id.
    /// When `items` or `props` are given, the leaf's child collections,
    /// metadata and items are wiped and replaced.
    pub async fn create_collection(
        &self,
        href: &str,
        items: Option<&[String]>,
        props: Option<&Metadata>,
    ) -> AppResult<CollectionHandle> {
        let mut segments: Vec<String> = split_path(href).into_iter().map(str::to_string).collect();
        if segments.is_empty() {
            warn!(href, "Refusing to recreate the root collection");
            return Err(AppError::validation("Invalid path: the root cannot be created"));
        }
        if segments.len() > MAX_COLLECTION_DEPTH {
            warn!(href, "Collection path too deep");
            return Err(AppError::validation(format!("Invalid path: {href}")));
        }
        if segments.len() == 2 && Uuid::parse_str(&segments[1]).is_err() {
            segments[1] = Uuid::new_v4().to_string();
        }
        let tag = props.map(CollectionTag::from_props).unwrap_or_default();

        let mut tx = self.inner.db.begin().await?;
        let conn: &mut PgConnection = &mut tx;

        let mut parent = self.inner.root.clone();
        let leaf_index = segments.len() - 1;
        for (i, name) in segments.iter().enumerate() {
            let is_leaf = i == leaf_index;
            parent = match CollectionRepository::find_child(&mut *conn, parent.id, name).await? {
                Some(existing) => {
                    if is_leaf && props.is_some() && existing.tag() != tag {
                        CollectionRepository::set_tag(&mut *conn, existing.id, tag).await?;
                    }
                    existing
                }
                None => {
                    let id = match i {
                        1 => Uuid::parse_str(name).unwrap_or_else(|_| Uuid::new_v4()),
                        _ => Uuid::new_v4(),
                    };
                    let data = NewCollection {
                        id,
                        parent_id: Some(parent.id),
                        domain_id: self.inner.config.domain_id,
                        name: Some(name.clone()),
                        tag: if is_leaf { tag } else { CollectionTag::None },
                    };
                    let created = CollectionRepository::create(&mut *conn, &data, now_ms()).await?;
                    info!(collection_id = %created.id, name = %name, "Collection created");
                    created
                }
            };
        }
        let leaf = parent;

        if items.is_some() || props.is_some() {
            let dropped = CollectionRepository::delete_children(&mut *conn, leaf.id).await?;
            MetadataRepository::delete_by_collection(&mut *conn, leaf.id).await?;
            let removed = ItemRepository::delete_by_collection(&mut *conn, leaf.id).await?;
            info!(
                collection_id = %leaf.id,
                collections = dropped,
                items = removed,
                "Collection contents replaced"
            );
        }
        if let Some(props) = props {
            MetadataRepository::insert_all(&mut *conn, leaf.id, props).await?;
        }
        if let Some(items) = items {
            for text in items {
                let parsed = self.inner.parser.parse(text)?;
                let uid = parsed
                    .uid
                    .ok_or_else(|| AppError::validation("Imported item has no UID"))?;
                let suffix = tag.item_suffix().unwrap_or(parsed.kind.extension());
                self.upload_in(&mut *conn, leaf.id, &format!("{uid}{suffix}"), text)
                    .await?;
            }
        }
        CollectionRepository::touch(&mut *conn, leaf.id, now_ms()).await?;
        commit(tx).await?;

        if items.is_some() || props.is_some() {
            let empty = Metadata::new();
            self.cache_metadata(leaf.id, props.unwrap_or(&empty)).await?;
        }
        Ok(CollectionHandle::new(self.clone(), leaf.id, segments.join("/")))
    }

    /// Move an item to `to_href` in `to`, replacing any item already there.
    pub async fn move_item(
        &self,
        from: &CollectionHandle,
        href: &str,
        to: &CollectionHandle,
        to_href: &str,
    ) -> AppResult<()> {
        if from.id() == to.id() && href == to_href {
            return Ok(());
        }

        let mut tx = self.inner.db.begin().await?;
        let conn: &mut PgConnection = &mut tx;

        let item = ItemRepository::find_by_href(&mut *conn, from.id(), href)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {href} not found")))?;

        ItemRepository::delete(&mut *conn, to.id(), to_href).await?;
        ItemRepository::relocate(&mut *conn, from.id(), href, to.id(), to_href, now_ms()).await?;
        let now = now_ms();
        CollectionRepository::touch(&mut *conn, from.id(), now).await?;
        CollectionRepository::touch(&mut *conn, to.id(), now).await?;

        let tracker = &self.inner.tracker;
        tracker
            .advance(&mut *conn, to.id(), to_href, Some(&item.etag()))
            .await?;
        tracker.advance(&mut *conn, from.id(), href, None).await?;
        commit(tx).await?;

        info!(
            from = %from.id(),
            href,
            to = %to.id(),
            to_href,
            "Item moved"
        );
        Ok(())
    }

    /// Placeholder lock: never blocks and excludes nothing.
    pub fn acquire_lock(&self, mode: LockMode, user: &str) -> StoreLock {
        StoreLock::new(mode, user)
    }

    /// Check connectivity and that the root still exists.
    pub async fn verify(&self) -> AppResult<bool> {
        if !self.inner.db.health_check().await? {
            return Ok(false);
        }
        let mut tx = self.inner.db.begin().await?;
        let root = CollectionRepository::find_root(&mut tx).await?;
        commit(tx).await?;
        Ok(root.is_some_and(|r| r.id == self.inner.root.id))
    }

    /// Apply retention to every collection, one transaction each.
    pub async fn purge_all(&self) -> AppResult<PurgeStats> {
        let mut tx = self.inner.db.begin().await?;
        let ids = CollectionRepository::list_ids(&mut tx).await?;
        commit(tx).await?;

        let collections = ids.len();
        let mut total = PurgeStats::default();
        for id in ids {
            total += self.purge_collection(id).await?;
        }
        info!(
            collections,
            tombstones = total.tombstones,
            snapshots = total.snapshots,
            "Retention sweep finished"
        );
        Ok(total)
    }

    pub(crate) async fn purge_collection(&self, collection_id: Uuid) -> AppResult<PurgeStats> {
        let mut tx = self.inner.db.begin().await?;
        let stats = self.inner.tracker.purge(&mut tx, collection_id).await?;
        commit(tx).await?;
        if stats != PurgeStats::default() {
            debug!(collection_id = %collection_id, tombstones = stats.tombstones, snapshots = stats.snapshots, "Collection purged");
        }
        Ok(stats)
    }

    /// Store `text` at `href` inside an open transaction.
    pub(crate) async fn upload_in(
        &self,
        conn: &mut PgConnection,
        collection_id: Uuid,
        href: &str,
        text: &str,
    ) -> AppResult<Item> {
        let identity = HrefIdentity::resolve(href).inspect_err(|_| {
            warn!(href, "Upload rejected: unsupported extension");
        })?;
        let parsed = self.inner.parser.parse(text)?;
        if parsed.kind != identity.kind {
            warn!(href, "Upload rejected: payload does not match extension");
            return Err(AppError::validation(format!(
                "Payload format does not match {href}"
            )));
        }

        let (data, fields) = match identity.kind {
            ItemKind::VCard => (
                self.inner.parser.with_uid(text, &identity.id.to_string())?,
                parsed.fields,
            ),
            ItemKind::VCalendar => (text.to_string(), Default::default()),
        };
        let mut upsert = UpsertItem {
            id: identity.id,
            collection_id,
            name: identity.href.clone(),
            data: data.into_bytes(),
            fields,
        };

        let now = now_ms();
        if ItemRepository::exists(&mut *conn, collection_id, &upsert.name).await? {
            ItemRepository::update(&mut *conn, &upsert, now).await?;
        } else {
            // Row ids are global; the href stem may already name an item
            // in another collection (or one moved away from here).
            if ItemRepository::id_in_use(&mut *conn, upsert.id).await? {
                upsert.id = Uuid::new_v4();
                debug!(collection_id = %collection_id, href = %upsert.name, id = %upsert.id, "Href id taken, minted row id");
            }
            ItemRepository::create(&mut *conn, &upsert, now).await?;
        }
        CollectionRepository::touch(&mut *conn, collection_id, now).await?;

        let etag = Etag::of(&upsert.data);
        self.inner
            .tracker
            .advance(&mut *conn, collection_id, &upsert.name, Some(&etag))
            .await?;

        let item = ItemRepository::find_by_href(conn, collection_id, &upsert.name)
            .await?
            .ok_or_else(|| AppError::internal(format!("Uploaded item {} not found", upsert.name)))?;
        info!(collection_id = %collection_id, href = %item.name, etag = %etag, "Item uploaded");
        Ok(item)
    }

    /// Cache the metadata of a collection, or drop the entry when empty.
    pub(crate) async fn cache_metadata(&self, collection_id: Uuid, props: &Metadata) -> AppResult<()> {
        let key = keys::collection_metadata(collection_id);
        if props.is_empty() {
            self.inner.cache.delete(&key).await
        } else {
            self.inner
                .cache
                .set_json(&key, props, self.inner.config.metadata_ttl())
                .await
        }
    }
}
