//! Core traits defined in `davstore-core` and implemented by other crates.

pub mod cache;
pub mod credential;

pub use cache::CacheProvider;
pub use credential::CredentialVerifier;
