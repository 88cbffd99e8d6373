//! Downloader server library
//!
//! Exposes the internal modules for the binaries and the end-to-end tests.

pub mod config;
pub mod diagnostics;
pub mod downloads;
pub mod file_browser;
pub mod probes;
pub mod server;
pub mod settings;
pub mod sqlite_persistence;
pub mod user;

pub use diagnostics::{Diagnostics, ProbesConfig};
pub use downloads::{DownloadStore, SqliteDownloadStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use settings::{SettingsStore, SqliteSettingsStore};
pub use sqlite_persistence::Database;
pub use user::{SqliteUserStore, UserManager};
