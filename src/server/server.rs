use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;

use super::auth_routes::auth_routes;
use super::browse_routes::browse_routes;
use super::download_routes::download_routes;
use super::settings_routes::settings_routes;
use super::{log_requests, state::*, ServerConfig};
use crate::diagnostics::{Diagnostics, DiagnosticsReport, ProbesConfig};
use crate::downloads::SqliteDownloadStore;
use crate::settings::SqliteSettingsStore;
use crate::sqlite_persistence::Database;
use crate::user::{SqliteUserStore, UserManager};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness only, touches no dependency.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_diagnostics(State(diagnostics): State<GuardedDiagnostics>) -> Json<DiagnosticsReport> {
    Json(diagnostics.run().await)
}

impl ServerState {
    fn new(config: ServerConfig, db: Database, probes: ProbesConfig) -> Result<ServerState> {
        let settings_store: GuardedSettingsStore =
            Arc::new(SqliteSettingsStore::new(db.clone()));
        let diagnostics = Diagnostics::new(db.clone(), settings_store.clone(), probes)?;

        Ok(ServerState {
            config,
            start_time: Instant::now(),
            user_manager: Arc::new(UserManager::new(Arc::new(SqliteUserStore::new(db.clone())))),
            download_store: Arc::new(SqliteDownloadStore::new(db)),
            settings_store,
            diagnostics: Arc::new(diagnostics),
        })
    }
}

pub fn make_app(config: ServerConfig, db: Database, probes: ProbesConfig) -> Result<Router> {
    let state = ServerState::new(config, db, probes)?;

    let api_routes: Router<ServerState> = Router::new()
        .nest("/auth", auth_routes())
        .nest("/downloads", download_routes())
        .nest("/settings", settings_routes())
        .nest("/browse", browse_routes())
        .route("/health", get(health))
        .route("/diagnostics", get(get_diagnostics));

    let app: Router = Router::new()
        .route("/", get(home))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state);

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

pub async fn run_server(config: ServerConfig, db: Database, probes: ProbesConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(config, db, probes)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
