mod models;
mod sqlite_download_store;

pub use models::*;
pub use sqlite_download_store::SqliteDownloadStore;

use anyhow::Result;

/// Ledger of requested downloads. Nothing here fetches anything.
pub trait DownloadStore: Send + Sync {
    /// All jobs, newest first.
    fn list(&self) -> Result<Vec<DownloadJob>>;

    fn get(&self, id: i64) -> Result<Option<DownloadJob>>;

    /// Queues a job as pending with zero progress and returns it.
    fn create(&self, download: NewDownload) -> Result<DownloadJob>;

    /// Returns whether a row was removed.
    fn delete(&self, id: i64) -> Result<bool>;
}
