//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors convert into
//! `HttpAppError` so every failure renders with the same status, body and logging.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fusion_core::{AppError, ErrorMetadata, LogLevel, ValidationError};
use fusion_media::MediaHostError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: `IntoResponse` and `AppError` both live outside this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

pub(crate) fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, show_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors.
        let show_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, show_details);

        (status, Json(body)).into_response()
    }
}

/// Map a media host failure, using `context` as the client-facing message for upstream errors.
pub fn media_error(err: MediaHostError, context: &str) -> HttpAppError {
    let app = match err {
        MediaHostError::NotConfigured(_) => {
            AppError::Configuration("Media service configuration missing".to_string())
        }
        other => AppError::upstream(context, other),
    };
    HttpAppError(app)
}

impl From<MediaHostError> for HttpAppError {
    fn from(err: MediaHostError) -> Self {
        media_error(err, "Media service request failed")
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.user_message()),
            ValidationError::EmptyFile => AppError::BadRequest(err.user_message()),
        };
        HttpAppError(app)
    }
}

/// A body over the request limit surfaces as a multipart error carrying 413.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_maps_to_configuration_error() {
        let HttpAppError(app_err) = media_error(
            MediaHostError::NotConfigured("missing".to_string()),
            "Failed to upload image",
        );
        match app_err {
            AppError::Configuration(msg) => assert_eq!(msg, "Media service configuration missing"),
            other => panic!("Expected Configuration variant, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_upload_uses_context_as_client_message() {
        let HttpAppError(app_err) = media_error(
            MediaHostError::Rejected {
                status: 401,
                message: "Invalid Signature".to_string(),
            },
            "Failed to upload video",
        );
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.client_message(), "Failed to upload video");
        assert!(app_err.detailed_message().contains("Invalid Signature"));
    }

    #[test]
    fn test_from_validation_error_file_too_large() {
        let HttpAppError(app_err) = ValidationError::FileTooLarge {
            size: 80 * 1024 * 1024,
            max: 70 * 1024 * 1024,
        }
        .into();
        match app_err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("70MB")),
            other => panic!("Expected PayloadTooLarge variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_validation_error_empty_file() {
        let HttpAppError(app_err) = ValidationError::EmptyFile.into();
        match app_err {
            AppError::BadRequest(msg) => assert_eq!(msg, "File is empty"),
            other => panic!("Expected BadRequest variant, got {:?}", other),
        }
    }

    #[test]
    fn test_sensitive_error_hides_details() {
        let err = AppError::query("Failed to fetch videos", "connection refused");
        let body = ErrorResponse::from_app_error(&err, !err.is_sensitive());
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"], "Failed to fetch videos");
        assert_eq!(json["code"], "QUERY_ERROR");
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let err = AppError::BadRequest("No file provided".to_string());
        let body = ErrorResponse::from_app_error(&err, true);
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"], "No file provided");
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_some());
    }
}
