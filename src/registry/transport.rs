//! Registry HTTP transport
//!
//! Uploads the compressed artifact to one registry route and maps the
//! response onto the classified transport outcomes the publisher needs.
//! Unauthorized is modeled as an HTTP 401 condition, not a string match on
//! the response body.

use crate::security::Credentials;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upload timeout; expiry is reported as a plain transport error
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Classified outcome of a single upload attempt
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP 401: the registry rejected the (possibly absent) credentials
    #[error("unauthorized")]
    Unauthorized,

    /// Structured registry error carrying a `code` field
    #[error("registry error {code}: {message}")]
    Registry {
        code: String,
        suggested_version: Option<String>,
        message: String,
    },

    /// Anything else: connection failures, timeouts, opaque responses
    #[error("{0}")]
    Other(String),
}

/// Structured error body returned by the registry
#[derive(Debug, Deserialize)]
struct RegistryErrorBody {
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    details: Option<RegistryErrorDetails>,
}

#[derive(Debug, Deserialize)]
struct RegistryErrorDetails {
    #[serde(rename = "suggestedVersion")]
    suggested_version: Option<String>,
}

/// Registry transport contract
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Upload the artifact to `route`, authenticating when credentials are
    /// present
    async fn upload(
        &self,
        route: &str,
        artifact_path: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<(), TransportError>;
}

/// reqwest-backed transport performing a PUT of the artifact body
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RegistryTransport for HttpTransport {
    async fn upload(
        &self,
        route: &str,
        artifact_path: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<(), TransportError> {
        let body = tokio::fs::read(artifact_path)
            .await
            .map_err(|e| TransportError::Other(format!("{}: {}", artifact_path.display(), e)))?;

        let mut request = self
            .client
            .put(route)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body);

        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(creds.password.expose_secret()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(TransportError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();
        if let Ok(parsed) = serde_json::from_str::<RegistryErrorBody>(&text)
            && let Some(code) = parsed.code
        {
            return Err(TransportError::Registry {
                code,
                suggested_version: parsed.details.and_then(|d| d.suggested_version),
                message: parsed.error.unwrap_or_default(),
            });
        }

        Err(TransportError::Other(format!("{}: {}", status, text)))
    }
}
