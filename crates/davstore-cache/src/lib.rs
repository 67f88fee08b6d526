//! # davstore-cache
//!
//! In-process cache provider for davstore built on
//! [moka](https://crates.io/crates/moka). Used for short-lived, read-only
//! optimizations only: collection metadata freshness and credential
//! decisions. Nothing in the store relies on it for correctness.

pub mod keys;
pub mod memory;
pub mod provider;

pub use memory::MemoryCacheProvider;
pub use provider::CacheManager;
