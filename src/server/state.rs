use axum::extract::FromRef;

use crate::diagnostics::Diagnostics;
use crate::downloads::DownloadStore;
use crate::settings::SettingsStore;
use crate::user::UserManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedDownloadStore = Arc<dyn DownloadStore>;
pub type GuardedSettingsStore = Arc<dyn SettingsStore>;
pub type GuardedDiagnostics = Arc<Diagnostics>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub user_manager: GuardedUserManager,
    pub download_store: GuardedDownloadStore,
    pub settings_store: GuardedSettingsStore,
    pub diagnostics: GuardedDiagnostics,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedDownloadStore {
    fn from_ref(input: &ServerState) -> Self {
        input.download_store.clone()
    }
}

impl FromRef<ServerState> for GuardedSettingsStore {
    fn from_ref(input: &ServerState) -> Self {
        input.settings_store.clone()
    }
}

impl FromRef<ServerState> for GuardedDiagnostics {
    fn from_ref(input: &ServerState) -> Self {
        input.diagnostics.clone()
    }
}
