//! Item domain entities.

pub mod etag;
pub mod fields;
pub mod href;
pub mod model;

pub use etag::Etag;
pub use fields::ItemFields;
pub use href::{HrefIdentity, ItemKind};
pub use model::{Item, UpsertItem};
