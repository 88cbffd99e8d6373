//! HTTP client for end-to-end tests
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client logged in as `TEST_USER`.
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(TEST_USER, TEST_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Test user authentication failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/auth/login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST /api/auth/logout
    pub async fn logout(&self) -> Response {
        self.client
            .post(self.url("/api/auth/logout"))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// GET /api/auth/session
    pub async fn get_session(&self) -> Response {
        self.client
            .get(self.url("/api/auth/session"))
            .send()
            .await
            .expect("Session request failed")
    }

    /// POST /api/auth/password
    pub async fn change_password(&self, current: &str, new: &str) -> Response {
        self.client
            .post(self.url("/api/auth/password"))
            .json(&json!({ "currentPassword": current, "newPassword": new }))
            .send()
            .await
            .expect("Change password request failed")
    }

    // ========================================================================
    // Download Endpoints
    // ========================================================================

    /// GET /api/downloads
    pub async fn list_downloads(&self) -> Response {
        self.client
            .get(self.url("/api/downloads"))
            .send()
            .await
            .expect("List downloads request failed")
    }

    /// POST /api/downloads
    pub async fn create_download(&self, body: Value) -> Response {
        self.client
            .post(self.url("/api/downloads"))
            .json(&body)
            .send()
            .await
            .expect("Create download request failed")
    }

    /// GET /api/downloads/{id}
    pub async fn get_download(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/downloads/{}", id)))
            .send()
            .await
            .expect("Get download request failed")
    }

    /// DELETE /api/downloads/{id}
    pub async fn delete_download(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/api/downloads/{}", id)))
            .send()
            .await
            .expect("Delete download request failed")
    }

    // ========================================================================
    // Settings Endpoints
    // ========================================================================

    /// GET /api/settings
    pub async fn get_settings(&self) -> Response {
        self.client
            .get(self.url("/api/settings"))
            .send()
            .await
            .expect("Get settings request failed")
    }

    /// PUT /api/settings
    pub async fn put_settings(&self, body: Value) -> Response {
        self.client
            .put(self.url("/api/settings"))
            .json(&body)
            .send()
            .await
            .expect("Put settings request failed")
    }

    // ========================================================================
    // Diagnostics and misc
    // ========================================================================

    /// GET /api/diagnostics
    pub async fn get_diagnostics(&self) -> Response {
        self.client
            .get(self.url("/api/diagnostics"))
            .send()
            .await
            .expect("Diagnostics request failed")
    }

    /// GET /api/health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(self.url("/api/health"))
            .send()
            .await
            .expect("Health request failed")
    }

    /// GET /api/browse
    pub async fn browse(&self, path: Option<&str>) -> Response {
        let mut request = self.client.get(self.url("/api/browse"));
        if let Some(path) = path {
            request = request.query(&[("path", path)]);
        }
        request.send().await.expect("Browse request failed")
    }

    /// POST /api/browse/folder
    pub async fn create_folder(&self, parent: &str, name: &str) -> Response {
        self.client
            .post(self.url("/api/browse/folder"))
            .json(&json!({ "parent": parent, "name": name }))
            .send()
            .await
            .expect("Create folder request failed")
    }
}
