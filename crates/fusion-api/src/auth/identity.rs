//! Identity provider abstraction and the shared-secret (HS256) implementation

use crate::auth::models::{Caller, JwtClaims};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use fusion_core::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Cookie the hosted identity provider stores the session token in
pub const SESSION_COOKIE: &str = "__session";

/// Verifies a session token and resolves the caller it belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Caller, AppError>;
}

/// Session token from `Authorization: Bearer` or, failing that, the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub(crate) fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    tracing::debug!("JWT validation failed: {}", e);
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token has expired".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
            AppError::Unauthorized("Invalid token issuer".to_string())
        }
        jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
            AppError::Unauthorized("Token is not yet valid (nbf)".to_string())
        }
        _ => AppError::Unauthorized(format!("Invalid or expired token: {}", e)),
    }
}

pub(crate) fn strict_validation(algorithms: &[Algorithm], issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(algorithms[0]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation.algorithms = algorithms.to_vec();
    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
    }
    validation
}

/// HS256 tokens signed with a shared secret. Meant for development and tests.
pub struct SharedSecretIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl SharedSecretIdentityProvider {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: strict_validation(&[Algorithm::HS256], issuer),
        }
    }
}

#[async_trait]
impl IdentityProvider for SharedSecretIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(map_jwt_error)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".to_string()));
        }
        Ok(data.claims.into())
    }
}
