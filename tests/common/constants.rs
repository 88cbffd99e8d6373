//! Shared constants for end-to-end tests

/// Seeded test user
pub const TEST_USER: &str = "testuser";

pub const TEST_PASS: &str = "testpass123";

/// Timeout applied to every request made by `TestClient`
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout of every diagnostics probe in the test server
pub const PROBE_TIMEOUT_MS: u64 = 500;
