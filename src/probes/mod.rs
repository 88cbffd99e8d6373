//! Reachability and credential probes for the external services the
//! downloader depends on.

mod content_site;
mod file_host;
mod media_server;

pub use content_site::{ContentSiteChecker, DEFAULT_CONTENT_SITE_URL};
pub use file_host::{FileHostChecker, DEFAULT_FILE_HOST_URL};
pub use media_server::MediaServerChecker;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FILE_HOST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MEDIA_SERVER_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONTENT_SITE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("API key is missing")]
    MissingCredential,

    #[error("Not configured")]
    NotConfigured,

    #[error("Unreachable: {0}")]
    Unreachable(String),

    #[error("Credentials rejected (status {0})")]
    InvalidCredential(StatusCode),

    #[error("Unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}

impl ProbeError {
    fn from_request_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Unreachable("request timed out".to_string())
        } else if err.is_connect() {
            ProbeError::Unreachable("connection failed".to_string())
        } else {
            ProbeError::Unreachable(err.without_url().to_string())
        }
    }
}

/// A single outbound check against one external dependency.
///
/// Implementations make at most one request, never retry, and keep no state
/// between calls.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name shown in the diagnostics report.
    fn service_name(&self) -> &'static str;

    async fn check(&self) -> Result<(), ProbeError>;
}

fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
