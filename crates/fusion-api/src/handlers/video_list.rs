use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use fusion_core::models::MediaRecord;
use fusion_core::AppError;
use std::sync::Arc;

/// Every stored video, newest first. Public: no caller required.
#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Videos ordered by creation time, newest first", body = Vec<MediaRecord>),
        (status = 500, description = "Failed to fetch videos", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MediaRecord>>, HttpAppError> {
    let videos = state
        .db
        .videos
        .list_recent()
        .await
        .map_err(|e| AppError::query("Failed to fetch videos", e))?;

    tracing::debug!(count = videos.len(), "Listed videos");
    Ok(Json(videos))
}
