mod file_config;

pub use file_config::{FileConfig, ProbesFileConfig};

use crate::diagnostics::ProbesConfig;
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "downloader.db";

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub file_host_api_key: Option<String>,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub secure_cookies: bool,
    pub probes: ProbesConfig,
}

impl AppConfig {
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());
        let secure_cookies = file.secure_cookies.unwrap_or(cli.secure_cookies);

        let probes_file = file.probes.unwrap_or_default();
        let defaults = ProbesConfig::default();
        let probes = ProbesConfig {
            file_host_url: probes_file.file_host_url.unwrap_or(defaults.file_host_url),
            file_host_api_key: probes_file
                .file_host_api_key
                .or_else(|| cli.file_host_api_key.clone())
                .filter(|key| !key.trim().is_empty()),
            file_host_timeout: probes_file
                .file_host_timeout_sec
                .map(Duration::from_secs)
                .unwrap_or(defaults.file_host_timeout),
            media_server_timeout: probes_file
                .media_server_timeout_sec
                .map(Duration::from_secs)
                .unwrap_or(defaults.media_server_timeout),
            content_site_url: probes_file
                .content_site_url
                .unwrap_or(defaults.content_site_url),
            content_site_timeout: probes_file
                .content_site_timeout_sec
                .map(Duration::from_secs)
                .unwrap_or(defaults.content_site_timeout),
        };

        Ok(Self {
            db_dir,
            port,
            logging_level,
            secure_cookies,
            probes,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(DB_FILE_NAME)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            secure_cookies: self.secure_cookies,
        }
    }

    pub fn probes_config(&self) -> ProbesConfig {
        self.probes.clone()
    }
}

/// Uses clap's ValueEnum parsing, case insensitive.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
