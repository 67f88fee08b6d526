//! Credential check against a remote HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use davstore_core::config::AuthConfig;
use davstore_core::error::{AppError, ErrorKind};
use davstore_core::result::AppResult;
use davstore_core::traits::CredentialVerifier;

/// Body posted to the credential endpoint.
#[derive(Debug, Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Posts `{"email", "password"}` to a configured URL. Any 2xx status
/// accepts the pair.
#[derive(Debug, Clone)]
pub struct RemoteCredentialVerifier {
    client: Client,
    url: String,
}

impl RemoteCredentialVerifier {
    /// Build a verifier from configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            url: config.credential_url.clone(),
        })
    }
}

#[async_trait]
impl CredentialVerifier for RemoteCredentialVerifier {
    async fn verify(&self, login: &str, secret: &str) -> AppResult<Option<String>> {
        if !login.contains('@') {
            debug!(login, "Rejecting login that is not an email address");
            return Ok(None);
        }

        let response = self
            .client
            .post(&self.url)
            .json(&CredentialRequest {
                email: login,
                password: secret,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Credential check failed: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(login, %status, "Credential accepted");
            Ok(Some(login.to_string()))
        } else {
            warn!(login, %status, "Credential rejected");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one request with the given status line and return the raw request.
    async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/check", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"}") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    fn verifier(url: String) -> RemoteCredentialVerifier {
        RemoteCredentialVerifier::new(&AuthConfig {
            credential_url: url,
            cache_ttl_seconds: 60,
            request_timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_without_at_sign_is_rejected_locally() {
        let verifier = verifier("http://127.0.0.1:9/unused".to_string());
        assert_eq!(verifier.verify("alice", "secret").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_success_status_accepts() {
        let (url, server) = serve_once("204 No Content").await;
        let result = verifier(url).verify("alice@example.com", "s3cret").await.unwrap();
        assert_eq!(result.as_deref(), Some("alice@example.com"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /check"));
        assert!(request.contains(r#""email":"alice@example.com""#));
        assert!(request.contains(r#""password":"s3cret""#));
    }

    #[tokio::test]
    async fn test_error_status_rejects() {
        let (url, _server) = serve_once("401 Unauthorized").await;
        let result = verifier(url).verify("alice@example.com", "wrong").await.unwrap();
        assert_eq!(result, None);
    }
}
