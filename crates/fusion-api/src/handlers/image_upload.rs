use crate::auth::Caller;
use crate::error::{media_error, ErrorResponse, HttpAppError};
use crate::handlers::upload_form::UploadForm;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use fusion_core::models::ImageUploadResponse;
use fusion_media::UploadOptions;
use std::sync::Arc;

const UPLOAD_FAILED: &str = "Failed to upload image";

#[utoipa::path(
    post,
    path = "/api/image-upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored on the media host", body = ImageUploadResponse),
        (status = 400, description = "No file provided or file is empty", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media service missing or upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %caller.user_id))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, HttpAppError> {
    state
        .media
        .host
        .ensure_configured()
        .map_err(|e| media_error(e, UPLOAD_FAILED))?;

    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    state.media.image_validator.validate_size(file.data.len())?;

    let mut options = UploadOptions::image();
    if let Some(filename) = file.filename {
        options = options.with_filename(filename);
    }

    let asset = state
        .media
        .host
        .upload(file.data, &options)
        .await
        .map_err(|e| media_error(e, UPLOAD_FAILED))?;

    tracing::info!(public_id = %asset.public_id, bytes = asset.bytes, "Image uploaded");

    Ok(Json(ImageUploadResponse {
        public_id: asset.public_id,
    }))
}
