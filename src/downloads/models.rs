use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a download job. Only `Pending` is ever written here; the
/// other states belong to the worker that consumes the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Completed,
    Error,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Pending => "pending",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DownloadStatus::Pending),
            "downloading" => Some(DownloadStatus::Downloading),
            "completed" => Some(DownloadStatus::Completed),
            "error" => Some(DownloadStatus::Error),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DownloadJob {
    pub id: i64,
    pub url: String,
    pub filename: Option<String>,
    pub custom_filename: Option<String>,
    pub target_path: Option<String>,
    pub status: DownloadStatus,
    pub progress: u8,
    pub size: Option<i64>,
    /// Bytes per second.
    pub speed: Option<i64>,
    /// Seconds.
    pub eta: Option<i64>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default)]
pub struct NewDownload {
    pub url: String,
    pub custom_filename: Option<String>,
    pub target_path: Option<String>,
}
