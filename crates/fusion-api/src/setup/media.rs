//! Media host setup

use anyhow::{Context, Result};
use fusion_core::Config;
use fusion_media::{CloudinaryHost, MediaHost};
use std::sync::Arc;

pub fn setup_media_host(config: &Config) -> Result<Arc<dyn MediaHost>> {
    let host = CloudinaryHost::new(config.cloudinary().clone())
        .context("Failed to create media host client")?;

    tracing::info!(
        backend = host.backend_name(),
        configured = config.cloudinary().is_configured(),
        upload_timeout_secs = config.cloudinary().upload_timeout_secs,
        "Media host initialized"
    );

    Ok(Arc::new(host))
}
