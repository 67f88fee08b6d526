//! Operations scoped to one collection.

use tracing::{debug, info, warn};
use uuid::Uuid;

use davstore_cache::keys;
use davstore_core::error::AppError;
use davstore_core::result::AppResult;
use davstore_core::traits::CacheProvider;
use davstore_database::connection::commit;
use davstore_database::repositories::{CollectionRepository, ItemRepository, MetadataRepository};
use davstore_entity::collection::Metadata;
use davstore_entity::collection::metadata::rows_to_metadata;
use davstore_entity::item::Item;
use davstore_entity::sync::SyncToken;
use davstore_entity::time::{http_date, now_ms};

use crate::sync::SyncOutcome;
use crate::version::PurgeStats;

use super::filter::{FilteredItems, ItemFilter};
use super::storage::CollectionStore;

/// A collection addressed by id, remembering the path it was reached by.
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    store: CollectionStore,
    id: Uuid,
    path: String,
}

impl CollectionHandle {
    pub(crate) fn new(store: CollectionStore, id: Uuid, path: String) -> Self {
        Self { store, id, path }
    }

    /// Collection id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path without surrounding slashes (empty for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up several hrefs. Every requested href appears once, in request
    /// order, with `None` when absent.
    pub async fn get_multi(&self, hrefs: &[String]) -> AppResult<Vec<(String, Option<Item>)>> {
        let mut tx = self.store.inner().db.begin().await?;
        let mut found = ItemRepository::find_by_hrefs(&mut tx, self.id, hrefs).await?;
        commit(tx).await?;

        let mut result: Vec<(String, Option<Item>)> = Vec::with_capacity(hrefs.len());
        for href in hrefs {
            if result.iter().any(|(seen, _)| seen == href) {
                continue;
            }
            let item = found
                .iter()
                .position(|item| &item.name == href)
                .map(|pos| found.swap_remove(pos));
            result.push((href.clone(), item));
        }
        Ok(result)
    }

    /// All items of the collection.
    pub async fn get_all(&self) -> AppResult<Vec<Item>> {
        let mut tx = self.store.inner().db.begin().await?;
        let items = ItemRepository::find_by_collection(&mut tx, self.id).await?;
        commit(tx).await?;
        Ok(items)
    }

    /// Candidate items for `filters`. A lone contains/equals text-match is
    /// answered with a raw-payload contains search; anything else returns
    /// every item.
    pub async fn get_filtered(&self, filters: &[ItemFilter]) -> AppResult<FilteredItems> {
        match ItemFilter::push_down(filters) {
            Some(text) => Ok(FilteredItems {
                items: self.find_containing(text).await?,
                narrowed: true,
            }),
            None => Ok(FilteredItems {
                items: self.get_all().await?,
                narrowed: false,
            }),
        }
    }

    /// Whether an item with this `UID` exists in the collection.
    pub async fn has_uid(&self, uid: &str) -> AppResult<bool> {
        let parser = &self.store.inner().parser;
        for item in self.find_containing(uid).await? {
            let parsed = parser.parse(&item.text())?;
            if parsed.uid.as_deref() == Some(uid) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn find_containing(&self, text: &str) -> AppResult<Vec<Item>> {
        let mut tx = self.store.inner().db.begin().await?;
        let items = ItemRepository::find_containing(&mut tx, self.id, text.as_bytes()).await?;
        commit(tx).await?;
        debug!(collection_id = %self.id, matches = items.len(), "Contains search");
        Ok(items)
    }

    /// Create or replace the item at `href`. Returns the stored item, whose
    /// href may differ from the requested one for vCards.
    pub async fn upload(&self, href: &str, text: &str) -> AppResult<Item> {
        let mut tx = self.store.inner().db.begin().await?;
        let item = self.store.upload_in(&mut tx, self.id, href, text).await?;
        commit(tx).await?;
        Ok(item)
    }

    /// Delete one item, or the whole collection when `href` is `None`.
    pub async fn delete(&self, href: Option<&str>) -> AppResult<()> {
        let inner = self.store.inner();
        let mut tx = inner.db.begin().await?;
        match href {
            None => {
                if !CollectionRepository::delete(&mut tx, self.id).await? {
                    return Err(AppError::not_found(format!("Collection {} not found", self.id)));
                }
                commit(tx).await?;
                inner.cache.delete(&keys::collection_metadata(self.id)).await?;
                info!(collection_id = %self.id, path = %self.path, "Collection deleted");
            }
            Some(href) => {
                if !ItemRepository::delete(&mut tx, self.id, href).await? {
                    return Err(AppError::not_found(format!("Item {href} not found")));
                }
                CollectionRepository::touch(&mut tx, self.id, now_ms()).await?;
                inner.tracker.advance(&mut tx, self.id, href, None).await?;
                commit(tx).await?;
                info!(collection_id = %self.id, href, "Item deleted");
            }
        }
        Ok(())
    }

    /// All metadata. Served from cache for up to the configured TTL after a
    /// non-empty read.
    pub async fn get_meta(&self) -> AppResult<Metadata> {
        let inner = self.store.inner();
        let key = keys::collection_metadata(self.id);
        if let Some(cached) = inner.cache.get_json::<Metadata>(&key).await? {
            return Ok(cached);
        }

        let mut tx = inner.db.begin().await?;
        let rows = MetadataRepository::find_by_collection(&mut tx, self.id).await?;
        commit(tx).await?;

        let meta = rows_to_metadata(rows);
        if !meta.is_empty() {
            inner.cache.set_json(&key, &meta, inner.config.metadata_ttl()).await?;
        }
        Ok(meta)
    }

    /// One metadata value.
    pub async fn get_meta_value(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.get_meta().await?.remove(key))
    }

    /// Replace all metadata.
    pub async fn set_meta(&self, props: &Metadata) -> AppResult<()> {
        let inner = self.store.inner();
        let mut tx = inner.db.begin().await?;
        MetadataRepository::replace(&mut tx, self.id, props).await?;
        CollectionRepository::touch(&mut tx, self.id, now_ms()).await?;
        commit(tx).await?;

        self.store.cache_metadata(self.id, props).await?;
        info!(collection_id = %self.id, keys = props.len(), "Metadata replaced");
        Ok(())
    }

    /// Modification time as an HTTP date.
    pub async fn last_modified(&self) -> AppResult<String> {
        let mut tx = self.store.inner().db.begin().await?;
        let collection = CollectionRepository::find_by_id(&mut tx, self.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Collection {} not found", self.id)))?;
        commit(tx).await?;
        Ok(http_date(collection.modified_at))
    }

    /// New sync token and the hrefs changed since `token` (empty for none).
    /// A malformed token is rejected before anything is read.
    pub async fn sync(&self, token: &str) -> AppResult<SyncOutcome> {
        let previous = SyncToken::parse(token).inspect_err(|_| {
            warn!(collection_id = %self.id, token, "Malformed sync token");
        })?;

        let inner = self.store.inner();
        let mut tx = inner.db.begin().await?;
        let outcome = inner.sync.sync(&mut tx, self.id, previous.as_ref()).await?;
        commit(tx).await?;
        Ok(outcome)
    }

    /// Apply retention to this collection.
    pub async fn purge(&self) -> AppResult<PurgeStats> {
        self.store.purge_collection(self.id).await
    }
}
