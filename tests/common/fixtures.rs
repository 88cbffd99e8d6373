//! Test data setup

use super::constants::*;
use anyhow::Result;
use downloader_server::{Database, SqliteUserStore, UserManager};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Opens a fresh database in a temp dir with `TEST_USER` already registered.
pub fn create_test_db_with_users() -> Result<(TempDir, Database)> {
    let temp_dir = TempDir::new()?;
    let db = Database::open(temp_dir.path().join("test.db"))?;

    let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(db.clone())));
    let user_id = user_manager.add_user(TEST_USER, TEST_PASS)?;
    eprintln!("Created test user {} with id {}", TEST_USER, user_id);

    Ok((temp_dir, db))
}

/// A base URL nothing is listening on, so probes fail fast.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
