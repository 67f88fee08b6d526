//! Item history domain entities.

pub mod model;

pub use model::{ItemHistory, chain_history_etag};
