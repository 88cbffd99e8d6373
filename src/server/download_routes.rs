//! Download queue HTTP routes.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{ApiError, ApiJson};
use super::state::{GuardedDownloadStore, ServerState};
use crate::downloads::{DownloadJob, NewDownload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDownloadBody {
    url: String,
    #[serde(default)]
    custom_filename: Option<String>,
    #[serde(default)]
    target_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueuedResponse {
    status: &'static str,
    id: i64,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Rejected download id: {}", rejection.body_text());
            Err(ApiError::Validation("Invalid ID".to_string()))
        }
    }
}

/// GET / - all downloads, newest first
async fn list_downloads(
    State(store): State<GuardedDownloadStore>,
) -> Result<Json<Vec<DownloadJob>>, ApiError> {
    store
        .list()
        .map(Json)
        .map_err(|err| ApiError::internal("Failed to fetch downloads", err))
}

/// POST / - queue a new download
async fn create_download(
    State(store): State<GuardedDownloadStore>,
    ApiJson(body): ApiJson<CreateDownloadBody>,
) -> Result<(StatusCode, Json<QueuedResponse>), ApiError> {
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::Validation("URL is required".to_string()));
    }

    let job = store
        .create(NewDownload {
            url: url.to_string(),
            custom_filename: body.custom_filename,
            target_path: body.target_path,
        })
        .map_err(|err| ApiError::internal("Failed to create download", err))?;
    info!("Queued download {} for {}", job.id, job.url);

    Ok((
        StatusCode::CREATED,
        Json(QueuedResponse {
            status: "queued",
            id: job.id,
        }),
    ))
}

/// GET /{id}
async fn get_download(
    State(store): State<GuardedDownloadStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DownloadJob>, ApiError> {
    let id = parse_id(id)?;
    match store.get(id) {
        Ok(Some(job)) => Ok(Json(job)),
        Ok(None) => Err(ApiError::NotFound("Download not found")),
        Err(err) => Err(ApiError::internal("Failed to fetch download", err)),
    }
}

/// DELETE /{id} - succeeds whether or not the job existed
async fn delete_download(
    State(store): State<GuardedDownloadStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(id)?;
    let removed = store
        .delete(id)
        .map_err(|err| ApiError::internal("Failed to delete download", err))?;
    if removed {
        info!("Deleted download {}", id);
    } else {
        debug!("Delete of unknown download {}", id);
    }
    Ok(Json(SuccessResponse { success: true }))
}

pub fn download_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_downloads).post(create_download))
        .route("/{id}", get(get_download).delete(delete_download))
}
