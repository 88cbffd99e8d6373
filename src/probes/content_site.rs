use super::{build_client, HealthCheck, ProbeError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONTENT_SITE_URL: &str = "https://www.zone-telechargement.cam";

pub struct ContentSiteChecker {
    client: reqwest::Client,
    url: String,
}

impl ContentSiteChecker {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl HealthCheck for ContentSiteChecker {
    fn service_name(&self) -> &'static str {
        "Zone-Telechargement"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        debug!("Probing content site at {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(ProbeError::from_request_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ProbeError::UnexpectedStatus(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::test_support::{spawn_router, spawn_status_server, unused_base_url};
    use axum::{http::StatusCode, routing::get, Router};

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn reachable_site_is_ok() {
        let base_url = spawn_status_server(StatusCode::OK).await;
        let checker = ContentSiteChecker::new(&base_url, TIMEOUT).unwrap();
        assert!(checker.check().await.is_ok());
    }

    #[tokio::test]
    async fn error_statuses_fail() {
        for status in [StatusCode::NOT_FOUND, StatusCode::SERVICE_UNAVAILABLE] {
            let base_url = spawn_status_server(status).await;
            let checker = ContentSiteChecker::new(&base_url, TIMEOUT).unwrap();
            assert!(matches!(
                checker.check().await,
                Err(ProbeError::UnexpectedStatus(s)) if s == status
            ));
        }
    }

    #[tokio::test]
    async fn unreachable_site_fails() {
        let checker = ContentSiteChecker::new(&unused_base_url().await, TIMEOUT).unwrap();
        assert!(matches!(
            checker.check().await,
            Err(ProbeError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn slow_site_times_out() {
        let router = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::OK
            }),
        );
        let base_url = spawn_router(router).await;
        let checker = ContentSiteChecker::new(&base_url, Duration::from_millis(200)).unwrap();

        let started = std::time::Instant::now();
        assert!(matches!(
            checker.check().await,
            Err(ProbeError::Unreachable(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
