//! # davstore-auth
//!
//! Authentication and authorization collaborators of the store.
//!
//! ## Modules
//!
//! - `credential` — remote credential check and its TTL-cached front
//! - `rights` — static path-prefix rights policy

pub mod credential;
pub mod rights;

pub use credential::{CachedAuthenticator, RemoteCredentialVerifier};
pub use rights::{PathRights, Rights};
