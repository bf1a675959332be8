//! RS256/ES256 session tokens verified against the identity provider's JWKS
//!
//! The whole key set is cached per `kid`. A token whose `kid` is not cached (or whose cached
//! key has expired) triggers a JWKS fetch, at most once per refresh interval; a `kid` still
//! missing after that is rejected.

use crate::auth::identity::{map_jwt_error, strict_validation, IdentityProvider};
use crate::auth::models::{Caller, JwtClaims};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fusion_core::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_CACHE_TTL_SECS: i64 = 3600;
const MIN_REFRESH_INTERVAL_SECS: i64 = 30;
const DEFAULT_KEY: &str = "default";
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    #[serde(rename = "kty")]
    pub key_type: String,
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
    #[serde(rename = "n")]
    pub modulus: Option<String>,
    #[serde(rename = "e")]
    pub exponent: Option<String>,
    #[serde(rename = "x")]
    pub x_coordinate: Option<String>,
    #[serde(rename = "y")]
    pub y_coordinate: Option<String>,
    #[serde(rename = "crv")]
    pub curve: Option<String>,
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, CachedKey>,
    last_fetch: Option<DateTime<Utc>>,
}

impl KeyCache {
    fn fresh(&self, cache_key: &str) -> Option<DecodingKey> {
        self.keys
            .get(cache_key)
            .filter(|cached| cached.expires_at > Utc::now())
            .map(|cached| cached.key.clone())
    }
}

pub struct JwksIdentityProvider {
    http_client: reqwest::Client,
    jwks_url: String,
    issuer: Option<String>,
    cache: Arc<RwLock<KeyCache>>,
    cache_ttl_seconds: i64,
    min_refresh_interval_seconds: i64,
    algorithms: Vec<Algorithm>,
}

impl JwksIdentityProvider {
    pub fn new(jwks_url: impl Into<String>, issuer: Option<String>) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build JWKS client: {}", e)))?;

        Ok(Self {
            http_client,
            jwks_url: jwks_url.into(),
            issuer,
            cache: Arc::new(RwLock::new(KeyCache::default())),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            min_refresh_interval_seconds: MIN_REFRESH_INTERVAL_SECS,
            algorithms: vec![Algorithm::RS256, Algorithm::ES256],
        })
    }

    /// Shortest time between two JWKS fetches. Unknown key ids seen inside this window
    /// are rejected without contacting the provider.
    pub fn with_min_refresh_interval(mut self, seconds: i64) -> Self {
        self.min_refresh_interval_seconds = seconds.max(0);
        self
    }

    async fn fetch_jwks(&self) -> Result<Jwks, AppError> {
        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to fetch JWKS: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized(format!(
                "JWKS endpoint returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to parse JWKS: {}", e)))
    }

    fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AppError> {
        match jwk.key_type.as_str() {
            "RSA" => {
                let n = jwk
                    .modulus
                    .as_ref()
                    .ok_or_else(|| AppError::Unauthorized("RSA key missing modulus".to_string()))?;
                let e = jwk.exponent.as_ref().ok_or_else(|| {
                    AppError::Unauthorized("RSA key missing exponent".to_string())
                })?;
                DecodingKey::from_rsa_components(n, e)
                    .map_err(|e| AppError::Unauthorized(format!("Failed to create RSA key: {}", e)))
            }
            "EC" => {
                let x = jwk.x_coordinate.as_ref().ok_or_else(|| {
                    AppError::Unauthorized("EC key missing x coordinate".to_string())
                })?;
                let y = jwk.y_coordinate.as_ref().ok_or_else(|| {
                    AppError::Unauthorized("EC key missing y coordinate".to_string())
                })?;
                if jwk.curve.as_deref() != Some("P-256") {
                    return Err(AppError::Unauthorized(format!(
                        "Unsupported EC curve: {:?} (only P-256 is supported)",
                        jwk.curve
                    )));
                }
                DecodingKey::from_ec_components(x, y)
                    .map_err(|e| AppError::Unauthorized(format!("Failed to create EC key: {}", e)))
            }
            other => Err(AppError::Unauthorized(format!(
                "Unsupported key type: {}",
                other
            ))),
        }
    }

    /// Replace the cached key set with every usable key in `jwks`.
    /// The first key is also stored as `default` for tokens without a `kid`.
    fn store_keys(&self, cache: &mut KeyCache, jwks: &Jwks) {
        let expires_at = Utc::now() + chrono::Duration::seconds(self.cache_ttl_seconds);
        cache.keys.clear();

        for (index, jwk) in jwks.keys.iter().enumerate() {
            let key = match Self::jwk_to_decoding_key(jwk) {
                Ok(key) => key,
                Err(e) => {
                    tracing::debug!(kid = ?jwk.key_id, error = %e, "Skipping unusable JWKS key");
                    continue;
                }
            };
            if index == 0 {
                cache.keys.insert(
                    DEFAULT_KEY.to_string(),
                    CachedKey {
                        key: key.clone(),
                        expires_at,
                    },
                );
            }
            if let Some(kid) = &jwk.key_id {
                cache.keys.insert(kid.clone(), CachedKey { key, expires_at });
            }
        }
        tracing::debug!(keys = cache.keys.len(), "Cached JWKS decoding keys");
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AppError> {
        let cache_key = kid.unwrap_or(DEFAULT_KEY);

        if let Some(key) = self.cache.read().await.fresh(cache_key) {
            return Ok(key);
        }

        // The write lock is held across the fetch so concurrent misses share one request.
        let mut cache = self.cache.write().await;
        if let Some(key) = cache.fresh(cache_key) {
            return Ok(key);
        }

        let now = Utc::now();
        let throttled = cache.last_fetch.is_some_and(|last| {
            now < last + chrono::Duration::seconds(self.min_refresh_interval_seconds)
        });
        if !throttled {
            cache.last_fetch = Some(now);
            let jwks = self.fetch_jwks().await?;
            self.store_keys(&mut cache, &jwks);
            if let Some(key) = cache.fresh(cache_key) {
                return Ok(key);
            }
        }

        Err(match kid {
            Some(kid) => AppError::Unauthorized(format!("Key ID {} not found in JWKS", kid)),
            None => AppError::Unauthorized("No keys found in JWKS".to_string()),
        })
    }
}

#[async_trait]
impl IdentityProvider for JwksIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token header: {}", e)))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}",
                header.alg
            )));
        }

        let key = self.decoding_key(header.kid.as_deref()).await?;
        let validation = strict_validation(&[header.alg], self.issuer.as_deref());
        let data = decode::<JwtClaims>(token, &key, &validation).map_err(map_jwt_error)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".to_string()));
        }
        Ok(data.claims.into())
    }
}
