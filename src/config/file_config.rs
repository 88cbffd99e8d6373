use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub secure_cookies: Option<bool>,

    pub probes: Option<ProbesFileConfig>,
}

/// `[probes]` table: endpoints and timeouts of the diagnostics checks.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ProbesFileConfig {
    pub file_host_url: Option<String>,
    pub file_host_api_key: Option<String>,
    pub file_host_timeout_sec: Option<u64>,
    pub media_server_timeout_sec: Option<u64>,
    pub content_site_url: Option<String>,
    pub content_site_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
