//! Identity provider setup

use crate::auth::{IdentityProvider, JwksIdentityProvider, SharedSecretIdentityProvider};
use anyhow::Result;
use fusion_core::Config;
use std::sync::Arc;

/// JWKS when `AUTH_JWKS_URL` is set, otherwise the shared HS256 secret.
pub fn setup_identity(config: &Config) -> Result<Arc<dyn IdentityProvider>> {
    let auth = config.auth();

    if let Some(jwks_url) = auth.jwks_url.as_deref() {
        tracing::info!(jwks_url = %jwks_url, issuer = ?auth.issuer, "Using JWKS identity provider");
        let provider = JwksIdentityProvider::new(jwks_url, auth.issuer.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create identity provider: {}", e))?;
        return Ok(Arc::new(provider));
    }

    match auth.jwt_secret.as_deref() {
        Some(secret) => {
            tracing::warn!("Using shared-secret identity provider; intended for development only");
            Ok(Arc::new(SharedSecretIdentityProvider::new(
                secret,
                auth.issuer.as_deref(),
            )))
        }
        None => Err(anyhow::anyhow!(
            "Either AUTH_JWKS_URL or AUTH_JWT_SECRET must be set"
        )),
    }
}
