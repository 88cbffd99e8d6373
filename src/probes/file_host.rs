use super::{build_client, HealthCheck, ProbeError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_FILE_HOST_URL: &str = "https://api.1fichier.com/v1";

/// Verifies the file host API key by asking for the account info.
pub struct FileHostChecker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FileHostChecker {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl HealthCheck for FileHostChecker {
    fn service_name(&self) -> &'static str {
        "1fichier"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let api_key = self.api_key.as_ref().ok_or(ProbeError::MissingCredential)?;

        let url = format!("{}/user/info.cgi", self.base_url);
        debug!("Probing file host at {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(ProbeError::from_request_error)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ProbeError::InvalidCredential(status))
            }
            status => Err(ProbeError::UnexpectedStatus(status)),
        }
    }
}
