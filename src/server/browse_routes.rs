//! Server-side folder picker for download targets.

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use super::error::{ApiError, ApiJson};
use super::state::ServerState;
use crate::file_browser::{self, BrowseError, DirectoryListing};

#[derive(Debug, Deserialize)]
struct BrowseQuery {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateFolderBody {
    parent: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct CreatedFolder {
    path: String,
}

fn browse_error(err: BrowseError) -> ApiError {
    match err {
        BrowseError::NotADirectory(_) => ApiError::Validation("Not a directory".to_string()),
        BrowseError::InvalidName => ApiError::Validation("Invalid folder name".to_string()),
        BrowseError::AlreadyExists(_) => ApiError::Conflict("Folder already exists".to_string()),
        BrowseError::Io(err) => ApiError::internal("Failed to access directory", err.into()),
    }
}

/// GET /?path= - defaults to the working directory
async fn browse(Query(query): Query<BrowseQuery>) -> Result<Json<DirectoryListing>, ApiError> {
    let dir = match query.path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => std::env::current_dir()
            .map_err(|err| ApiError::internal("Failed to resolve working directory", err.into()))?,
    };

    tokio::task::spawn_blocking(move || file_browser::list_directory(&dir))
        .await
        .map_err(|err| ApiError::internal("Failed to list directory", err.into()))?
        .map(Json)
        .map_err(browse_error)
}

/// POST /folder
async fn create_folder(
    ApiJson(body): ApiJson<CreateFolderBody>,
) -> Result<(StatusCode, Json<CreatedFolder>), ApiError> {
    let parent = PathBuf::from(body.parent.trim());
    let created =
        tokio::task::spawn_blocking(move || file_browser::create_folder(&parent, &body.name))
            .await
            .map_err(|err| ApiError::internal("Failed to create folder", err.into()))?
            .map_err(browse_error)?;
    info!("Created folder {:?}", created);

    Ok((
        StatusCode::CREATED,
        Json(CreatedFolder {
            path: created.to_string_lossy().to_string(),
        }),
    ))
}

pub fn browse_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(browse))
        .route("/folder", post(create_folder))
}
