use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLEX_URL_KEY: &str = "plexUrl";
pub const PLEX_TOKEN_KEY: &str = "plexToken";

/// A named filesystem location downloads can be saved into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPath {
    pub id: i64,
    pub name: String,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTargetPath {
    pub name: String,
    pub path: String,
}

/// Every stored setting plus the configured target paths, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub settings: BTreeMap<String, String>,
    pub paths: Vec<TargetPath>,
}
