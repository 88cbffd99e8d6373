use super::{DownloadJob, DownloadStatus, DownloadStore, NewDownload};
use crate::sqlite_persistence::{format_timestamp, parse_timestamp, Database};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::warn;

const DOWNLOAD_COLUMNS: &str = "id, url, filename, custom_filename, target_path, status, \
     progress, size, speed, eta, error, created_at, updated_at";

pub struct SqliteDownloadStore {
    db: Database,
}

impl SqliteDownloadStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_download(row: &rusqlite::Row) -> rusqlite::Result<DownloadJob> {
        let status_str: String = row.get("status")?;
        let status = DownloadStatus::parse(&status_str).unwrap_or_else(|| {
            warn!("Unknown download status '{}', reporting as error", status_str);
            DownloadStatus::Error
        });
        let created_at: String = row.get("created_at")?;
        let updated_at: Option<String> = row.get("updated_at")?;

        Ok(DownloadJob {
            id: row.get("id")?,
            url: row.get("url")?,
            filename: row.get("filename")?,
            custom_filename: row.get("custom_filename")?,
            target_path: row.get("target_path")?,
            status,
            progress: row.get::<_, i64>("progress")?.clamp(0, 100) as u8,
            size: row.get("size")?,
            speed: row.get("speed")?,
            eta: row.get("eta")?,
            error: row.get("error")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl DownloadStore for SqliteDownloadStore {
    fn list(&self) -> Result<Vec<DownloadJob>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM downloads ORDER BY created_at DESC, id DESC",
            DOWNLOAD_COLUMNS
        ))?;
        let jobs = stmt
            .query_map([], Self::row_to_download)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn get(&self, id: i64) -> Result<Option<DownloadJob>> {
        let conn = self.db.lock()?;
        let job = conn
            .query_row(
                &format!("SELECT {} FROM downloads WHERE id = ?1", DOWNLOAD_COLUMNS),
                params![id],
                Self::row_to_download,
            )
            .optional()?;
        Ok(job)
    }

    fn create(&self, download: NewDownload) -> Result<DownloadJob> {
        let created_at = Utc::now();
        let custom_filename = non_empty(download.custom_filename);
        let target_path = non_empty(download.target_path);

        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO downloads (url, custom_filename, target_path, status, progress, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                download.url,
                custom_filename,
                target_path,
                DownloadStatus::Pending.as_str(),
                format_timestamp(&created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();
        let job = conn.query_row(
            &format!("SELECT {} FROM downloads WHERE id = ?1", DOWNLOAD_COLUMNS),
            params![id],
            Self::row_to_download,
        )?;
        Ok(job)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.lock()?;
        let affected = conn.execute("DELETE FROM downloads WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
