//! # davstore-core
//!
//! Core crate for davstore. Contains configuration schemas, the cache
//! provider trait and the unified error system.
//!
//! This crate has **no** internal dependencies on other davstore crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
