//! Credential verification.

pub mod cached;
pub mod remote;

pub use cached::CachedAuthenticator;
pub use remote::RemoteCredentialVerifier;
