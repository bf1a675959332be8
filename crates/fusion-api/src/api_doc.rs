//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use fusion_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fusion API",
        version = "0.1.0",
        description = "Image and video uploads backed by a hosted media service. Uploads require a signed-in caller; the video listing is public."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::video_upload::upload_video,
        handlers::video_list::list_videos,
        health::health_check,
    ),
    components(
        schemas(
            models::MediaRecord,
            models::ImageUploadResponse,
            error::ErrorResponse,
            health::HealthCheckResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Image uploads"),
        (name = "videos", description = "Video uploads and listing"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_schemas() {
        let doc = ApiDoc::openapi();
        for path in ["/api/image-upload", "/api/video-upload", "/api/videos", "/api/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("MediaRecord"));
        assert!(schemas.contains_key("ImageUploadResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
