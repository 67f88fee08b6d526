//! Item entity model.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::item::etag::Etag;
use crate::item::fields::ItemFields;
use crate::time::http_date;

/// A leaf resource stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: Uuid,
    /// Owning collection.
    pub collection_id: Uuid,
    /// Last write time (epoch ms).
    pub modified_at: i64,
    /// Href, unique within the collection.
    pub name: String,
    /// Serialized payload.
    pub data: Vec<u8>,
    pub full_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub ext_number: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub categories: Vec<String>,
}

impl Item {
    /// The href this item is stored under.
    pub fn href(&self) -> &str {
        &self.name
    }

    /// Payload as text.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Current content fingerprint.
    pub fn etag(&self) -> Etag {
        Etag::of(&self.data)
    }

    /// Modification time as an HTTP date.
    pub fn last_modified(&self) -> String {
        http_date(self.modified_at)
    }
}

/// Data written by an item upload.
#[derive(Debug, Clone)]
pub struct UpsertItem {
    /// Row identifier (used only when inserting).
    pub id: Uuid,
    /// Owning collection.
    pub collection_id: Uuid,
    /// Href.
    pub name: String,
    /// Serialized payload.
    pub data: Vec<u8>,
    /// Extracted search columns.
    pub fields: ItemFields,
}
