//! Item payload parsing.

pub mod vobject;

use davstore_core::result::AppResult;
use davstore_entity::item::{ItemFields, ItemKind};

pub use vobject::VObjectParser;

/// What the store needs to know about an uploaded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    /// Detected resource format.
    pub kind: ItemKind,
    /// Value of the `UID` property, if present.
    pub uid: Option<String>,
    /// Search columns. Only vCards populate them.
    pub fields: ItemFields,
}

/// Format-parsing collaborator.
pub trait ItemParser: Send + Sync + std::fmt::Debug + 'static {
    /// Detect the format and extract UID and search fields.
    fn parse(&self, text: &str) -> AppResult<ParsedItem>;

    /// Return `text` with the vCard `UID` set to `uid`. Other formats are
    /// returned unchanged.
    fn with_uid(&self, text: &str, uid: &str) -> AppResult<String>;
}
