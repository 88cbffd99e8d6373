mod models;
mod sqlite_settings_store;

pub use models::*;
pub use sqlite_settings_store::SqliteSettingsStore;

use anyhow::Result;
use std::collections::BTreeMap;

pub trait SettingsStore: Send + Sync {
    /// Returns all key/value settings and the target paths ordered by id.
    fn get_all(&self) -> Result<SettingsSnapshot>;

    /// Returns the values of the requested keys that are present.
    fn get_values(&self, keys: &[&str]) -> Result<BTreeMap<String, String>>;

    /// Upserts `pairs` and replaces the whole path list, atomically.
    ///
    /// Either everything is written or the previous state is left untouched.
    fn replace_all(&self, pairs: &BTreeMap<String, String>, paths: &[NewTargetPath])
        -> Result<()>;
}
