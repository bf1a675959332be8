//! Application setup and initialization

pub mod database;
pub mod identity;
pub mod media;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use fusion_core::Config;
use fusion_db::PgVideoRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let media_host = media::setup_media_host(&config)?;
    let identity = identity::setup_identity(&config)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(PgVideoRepository::new(pool)),
        media_host,
        identity,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
