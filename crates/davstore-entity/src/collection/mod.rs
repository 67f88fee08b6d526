//! Collection domain entities.

pub mod metadata;
pub mod model;
pub mod tag;

pub use metadata::{CollectionMetadata, Metadata};
pub use model::{Collection, NewCollection};
pub use tag::CollectionTag;
