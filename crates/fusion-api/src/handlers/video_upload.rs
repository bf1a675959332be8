use crate::auth::Caller;
use crate::error::{media_error, ErrorResponse, HttpAppError};
use crate::handlers::upload_form::UploadForm;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use fusion_core::models::{MediaRecord, NewMediaRecord};
use fusion_core::{AppError, MediaKind};
use fusion_media::UploadOptions;
use std::sync::Arc;

const UPLOAD_FAILED: &str = "Failed to upload video";

/// Client-reported size before any client-side processing; falls back to the received length.
fn original_size(reported: Option<&str>, received: usize) -> i64 {
    reported
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|size| *size >= 0)
        .unwrap_or(received as i64)
}

#[utoipa::path(
    post,
    path = "/api/video-upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video transcoded, stored and recorded", body = MediaRecord),
        (status = 400, description = "No file provided or file is empty", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media service missing, upload or record write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %caller.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    multipart: Multipart,
) -> Result<Json<MediaRecord>, HttpAppError> {
    state
        .media
        .host
        .ensure_configured()
        .map_err(|e| media_error(e, UPLOAD_FAILED))?;

    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    state.media.video_validator.validate_size(file.data.len())?;

    let original_size_bytes = original_size(form.text("originalSize"), file.data.len());
    let mut options = UploadOptions::video();
    if let Some(filename) = file.filename {
        options = options.with_filename(filename);
    }

    let asset = state
        .media
        .host
        .upload(file.data, &options)
        .await
        .map_err(|e| media_error(e, UPLOAD_FAILED))?;

    let record = NewMediaRecord {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        external_id: asset.public_id.clone(),
        original_size_bytes,
        compressed_size_bytes: asset.bytes,
        duration_seconds: asset.duration.unwrap_or(0.0),
    };

    match state.db.videos.create(record).await {
        Ok(video) => {
            tracing::info!(
                video_id = %video.id,
                public_id = %video.external_id,
                original_size = video.original_size_bytes,
                compressed_size = video.compressed_size_bytes,
                "Video uploaded"
            );
            Ok(Json(video))
        }
        Err(e) => {
            // The asset is already stored; remove it in the background so it is not orphaned.
            let host = state.media.host.clone();
            let public_id = asset.public_id;
            tokio::spawn(async move {
                match host.destroy(&public_id, MediaKind::Video).await {
                    Ok(()) => {
                        tracing::info!(public_id = %public_id, "Removed orphaned upload after record write failure");
                    }
                    Err(err) => {
                        tracing::warn!(
                            public_id = %public_id,
                            error = %err,
                            "Failed to remove orphaned upload after record write failure"
                        );
                    }
                }
            });

            Err(AppError::write(UPLOAD_FAILED, e).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_size_prefers_reported_value() {
        assert_eq!(original_size(Some("123456"), 10), 123_456);
        assert_eq!(original_size(Some("0"), 10), 0);
    }

    #[test]
    fn test_original_size_falls_back_to_received_length() {
        assert_eq!(original_size(None, 10), 10);
        assert_eq!(original_size(Some("abc"), 10), 10);
        assert_eq!(original_size(Some("-5"), 10), 10);
        assert_eq!(original_size(Some("1.5"), 10), 10);
    }
}
