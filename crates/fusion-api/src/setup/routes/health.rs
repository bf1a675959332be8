use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use fusion_core::ErrorMetadata;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    /// `healthy` when the database answers, otherwise `degraded`
    pub status: String,
    pub database: String,
    /// `configured` or `missing configuration`
    pub media: String,
}

/// Liveness plus dependency status. Always 200 so a degraded store does not take the server out of rotation.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service status", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(TIMEOUT, state.db.videos.ping()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            e.client_message()
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            "timeout".to_string()
        }
    };

    let media = match state.media.host.ensure_configured() {
        Ok(()) => "configured",
        Err(_) => "missing configuration",
    };

    let status = if database == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
            media: media.to_string(),
        }),
    )
}
