use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{ApiError, ApiJson};
use super::state::{GuardedSettingsStore, ServerState};
use crate::diagnostics::APP_DISK_LABEL;
use crate::settings::{NewTargetPath, SettingsSnapshot, PLEX_TOKEN_KEY, PLEX_URL_KEY};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSettingsBody {
    #[serde(default)]
    plex_url: String,
    #[serde(default)]
    plex_token: String,
    #[serde(default)]
    paths: Vec<NewTargetPath>,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn get_settings(
    State(store): State<GuardedSettingsStore>,
) -> Result<Json<SettingsSnapshot>, ApiError> {
    store
        .get_all()
        .map(Json)
        .map_err(|err| ApiError::internal("Failed to fetch settings", err))
}

/// Replaces the media server settings and the full path list in one go.
async fn update_settings(
    State(store): State<GuardedSettingsStore>,
    ApiJson(body): ApiJson<UpdateSettingsBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let mut paths = Vec::with_capacity(body.paths.len());
    for path in body.paths {
        let name = path.name.trim();
        let location = path.path.trim();
        if name.is_empty() || location.is_empty() {
            return Err(ApiError::Validation(
                "Every path needs a name and a location".to_string(),
            ));
        }
        // The working directory already occupies this key in the disk report.
        if name == APP_DISK_LABEL {
            return Err(ApiError::Validation(format!(
                "\"{}\" is a reserved path name",
                APP_DISK_LABEL
            )));
        }
        paths.push(NewTargetPath {
            name: name.to_string(),
            path: location.to_string(),
        });
    }

    let mut pairs = BTreeMap::new();
    pairs.insert(PLEX_URL_KEY.to_string(), body.plex_url.trim().to_string());
    pairs.insert(PLEX_TOKEN_KEY.to_string(), body.plex_token.trim().to_string());

    store
        .replace_all(&pairs, &paths)
        .map_err(|err| ApiError::internal("Failed to save settings", err))?;
    Ok(Json(SuccessResponse { success: true }))
}

pub fn settings_routes() -> Router<ServerState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}
