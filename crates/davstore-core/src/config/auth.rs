//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Remote credential check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Endpoint receiving `{"email", "password"}`; any 2xx response accepts.
    #[serde(default = "default_credential_url")]
    pub credential_url: String,
    /// How long a credential decision is reused, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Timeout for the remote check, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential_url: default_credential_url(),
            cache_ttl_seconds: default_cache_ttl(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_credential_url() -> String {
    "http://localhost:8080/_internal/check/credential".to_string()
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    10
}
