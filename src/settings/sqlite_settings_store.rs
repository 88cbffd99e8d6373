use super::{NewTargetPath, SettingsSnapshot, SettingsStore, TargetPath};
use crate::sqlite_persistence::Database;
use anyhow::{Context, Result};
use rusqlite::params;
use std::collections::BTreeMap;
use tracing::debug;

pub struct SqliteSettingsStore {
    db: Database,
}

impl SqliteSettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get_all(&self) -> Result<SettingsSnapshot> {
        let conn = self.db.lock()?;

        let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;

        let mut stmt = conn.prepare("SELECT id, name, path FROM paths ORDER BY id")?;
        let paths = stmt
            .query_map([], |row| {
                Ok(TargetPath {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    path: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SettingsSnapshot { settings, paths })
    }

    fn get_values(&self, keys: &[&str]) -> Result<BTreeMap<String, String>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut values = BTreeMap::new();
        for key in keys {
            let mut rows = stmt.query(params![key])?;
            if let Some(row) = rows.next()? {
                values.insert(key.to_string(), row.get(0)?);
            }
        }
        Ok(values)
    }

    fn replace_all(
        &self,
        pairs: &BTreeMap<String, String>,
        paths: &[NewTargetPath],
    ) -> Result<()> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;

        for (key, value) in pairs {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("Failed to upsert setting {}", key))?;
        }

        tx.execute("DELETE FROM paths", [])?;
        for path in paths {
            tx.execute(
                "INSERT INTO paths (name, path) VALUES (?1, ?2)",
                params![path.name, path.path],
            )
            .with_context(|| format!("Failed to insert path {}", path.name))?;
        }

        tx.commit()?;
        debug!(
            "Replaced settings: {} keys, {} paths",
            pairs.len(),
            paths.len()
        );
        Ok(())
    }
}
