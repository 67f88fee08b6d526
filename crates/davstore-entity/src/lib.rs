//! # davstore-entity
//!
//! Domain entity models for davstore. Every struct in this crate represents
//! a database table row or a domain value object. Row structs additionally
//! derive `sqlx::FromRow`.
//!
//! All timestamps are milliseconds since the Unix epoch.

pub mod collection;
pub mod history;
pub mod item;
pub mod node;
pub mod sync;
pub mod time;
