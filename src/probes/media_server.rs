use super::{build_client, HealthCheck, ProbeError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const PLEX_TOKEN_HEADER: &str = "X-Plex-Token";

/// Hits the media server identity endpoint, which answers without doing any
/// library work.
pub struct MediaServerChecker {
    client: reqwest::Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl MediaServerChecker {
    pub fn new(
        base_url: Option<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            token: token.filter(|token| !token.is_empty()),
        })
    }
}

#[async_trait]
impl HealthCheck for MediaServerChecker {
    fn service_name(&self) -> &'static str {
        "Plex"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let base_url = self.base_url.as_ref().ok_or(ProbeError::NotConfigured)?;

        let url = format!("{}/identity", base_url);
        debug!("Probing media server at {}", url);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(PLEX_TOKEN_HEADER, token);
        }
        let response = request
            .send()
            .await
            .map_err(ProbeError::from_request_error)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ProbeError::InvalidCredential(status))
            }
            status => Err(ProbeError::UnexpectedStatus(status)),
        }
    }
}
