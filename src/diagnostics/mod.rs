//! Consolidated health report across the database, the external services
//! and the disk space of every download target.

mod disk;

pub use disk::{disk_space_report, APP_DISK_LABEL, DISK_READ_ERROR};

use crate::probes::{
    ContentSiteChecker, FileHostChecker, HealthCheck, MediaServerChecker, ProbeError,
    DEFAULT_CONTENT_SITE_TIMEOUT, DEFAULT_CONTENT_SITE_URL, DEFAULT_FILE_HOST_TIMEOUT,
    DEFAULT_FILE_HOST_URL, DEFAULT_MEDIA_SERVER_TIMEOUT,
};
use crate::settings::{SettingsStore, PLEX_TOKEN_KEY, PLEX_URL_KEY};
use crate::sqlite_persistence::Database;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub const DATABASE_SERVICE_NAME: &str = "Database";
const MEDIA_SERVER_SERVICE_NAME: &str = "Plex";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub service: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    fn ok(service: &str) -> Self {
        Self {
            service: service.to_string(),
            status: CheckStatus::Ok,
            message: None,
        }
    }

    fn failed(service: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            status,
            message: Some(message.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticsReport {
    pub checks: Vec<CheckResult>,
    pub disk_space: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct ProbesConfig {
    pub file_host_url: String,
    pub file_host_api_key: Option<String>,
    pub file_host_timeout: Duration,
    pub media_server_timeout: Duration,
    pub content_site_url: String,
    pub content_site_timeout: Duration,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            file_host_url: DEFAULT_FILE_HOST_URL.to_string(),
            file_host_api_key: None,
            file_host_timeout: DEFAULT_FILE_HOST_TIMEOUT,
            media_server_timeout: DEFAULT_MEDIA_SERVER_TIMEOUT,
            content_site_url: DEFAULT_CONTENT_SITE_URL.to_string(),
            content_site_timeout: DEFAULT_CONTENT_SITE_TIMEOUT,
        }
    }
}

pub struct Diagnostics {
    db: Database,
    settings: Arc<dyn SettingsStore>,
    file_host: FileHostChecker,
    content_site: ContentSiteChecker,
    media_server_timeout: Duration,
}

async fn run_check(checker: &dyn HealthCheck) -> CheckResult {
    let service = checker.service_name();
    match checker.check().await {
        Ok(()) => CheckResult::ok(service),
        Err(err @ ProbeError::NotConfigured) => {
            CheckResult::failed(service, CheckStatus::Warning, err.to_string())
        }
        Err(err) => {
            debug!("{} check failed: {}", service, err);
            CheckResult::failed(service, CheckStatus::Error, err.to_string())
        }
    }
}

impl Diagnostics {
    pub fn new(db: Database, settings: Arc<dyn SettingsStore>, config: ProbesConfig) -> Result<Self> {
        Ok(Self {
            db,
            settings,
            file_host: FileHostChecker::new(
                &config.file_host_url,
                config.file_host_api_key,
                config.file_host_timeout,
            )?,
            content_site: ContentSiteChecker::new(
                &config.content_site_url,
                config.content_site_timeout,
            )?,
            media_server_timeout: config.media_server_timeout,
        })
    }

    fn check_database(&self) -> CheckResult {
        match self.db.ping() {
            Ok(()) => CheckResult::ok(DATABASE_SERVICE_NAME),
            Err(err) => {
                error!("Database ping failed: {:#}", err);
                CheckResult::failed(DATABASE_SERVICE_NAME, CheckStatus::Error, "Database unavailable")
            }
        }
    }

    async fn check_media_server(&self) -> CheckResult {
        // Read on every run so settings changes apply without a restart.
        let mut values = match self.settings.get_values(&[PLEX_URL_KEY, PLEX_TOKEN_KEY]) {
            Ok(values) => values,
            Err(err) => {
                error!("Could not read media server settings: {:#}", err);
                return CheckResult::failed(
                    MEDIA_SERVER_SERVICE_NAME,
                    CheckStatus::Error,
                    "Failed to read settings",
                );
            }
        };

        let checker = match MediaServerChecker::new(
            values.remove(PLEX_URL_KEY),
            values.remove(PLEX_TOKEN_KEY),
            self.media_server_timeout,
        ) {
            Ok(checker) => checker,
            Err(err) => {
                error!("Could not build media server client: {:#}", err);
                return CheckResult::failed(
                    MEDIA_SERVER_SERVICE_NAME,
                    CheckStatus::Error,
                    "Internal error",
                );
            }
        };
        run_check(&checker).await
    }

    fn target_paths(&self) -> Vec<(String, PathBuf)> {
        match self.settings.get_all() {
            Ok(snapshot) => snapshot
                .paths
                .into_iter()
                .map(|p| (p.name, PathBuf::from(p.path)))
                .collect(),
            Err(err) => {
                error!("Could not read target paths: {:#}", err);
                Vec::new()
            }
        }
    }

    /// Never fails: each sub-check failure only degrades its own entry.
    pub async fn run(&self) -> DiagnosticsReport {
        let (database, file_host, media_server, content_site) = tokio::join!(
            async { self.check_database() },
            run_check(&self.file_host),
            self.check_media_server(),
            run_check(&self.content_site),
        );
        let disk_space = disk_space_report(self.target_paths()).await;

        DiagnosticsReport {
            checks: vec![database, file_host, media_server, content_site],
            disk_space,
        }
    }
}
