//! Configuration module
//!
//! Configuration is loaded once at start-up from the environment (and an optional
//! `.env` file) and then passed explicitly to whatever needs it.

use std::env;

use crate::error::AppError;
use crate::validation::{MediaKind, UploadValidator};

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 70;
const MEDIA_UPLOAD_TIMEOUT_SECS: u64 = 300;
const MIN_JWT_SECRET_LEN: usize = 32;

pub const DEFAULT_CLOUDINARY_API_BASE_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_CLOUDINARY_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    /// Emit JSON log lines instead of the compact console format
    pub log_json: bool,
}

/// Hosted media service settings. Credentials stay optional here: a missing
/// value is reported per request, not at start-up.
#[derive(Clone, Debug, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_base_url: String,
    pub delivery_base_url: String,
    pub upload_timeout_secs: u64,
}

/// Credentials resolved from a complete [`CloudinaryConfig`].
#[derive(Clone, Debug)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Returns the three credentials, or a configuration error when any is missing or blank.
    pub fn credentials(&self) -> Result<CloudinaryCredentials, AppError> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        }

        match (
            present(&self.cloud_name),
            present(&self.api_key),
            present(&self.api_secret),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(CloudinaryCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => Err(AppError::Configuration(
                "Media service configuration missing".to_string(),
            )),
        }
    }
}

/// Identity provider settings. Exactly one of `jwks_url` / `jwt_secret` is expected.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    pub jwks_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub issuer: Option<String>,
}

/// Full application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub cloudinary: CloudinaryConfig,
    pub auth: AuthConfig,
    pub max_image_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AppConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn log_json(&self) -> bool {
        self.inner().base.log_json
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn cloudinary(&self) -> &CloudinaryConfig {
        &self.inner().cloudinary
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.inner().auth
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.inner().max_image_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    /// Largest request body the server should accept: the bigger cap plus room for multipart framing.
    pub fn max_request_body_bytes(&self) -> usize {
        const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
        self.max_image_size_bytes()
            .max(self.max_video_size_bytes())
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    pub fn upload_validator(&self, kind: MediaKind) -> UploadValidator {
        match kind {
            MediaKind::Image => UploadValidator::new(kind, self.max_image_size_bytes()),
            MediaKind::Video => UploadValidator::new(kind, self.max_video_size_bytes()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            environment,
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let cloudinary = CloudinaryConfig {
            cloud_name: env_optional("CLOUDINARY_CLOUD_NAME")
                .or_else(|| env_optional("NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME")),
            api_key: env_optional("CLOUDINARY_API_KEY"),
            api_secret: env_optional("CLOUDINARY_API_SECRET"),
            api_base_url: env_optional("CLOUDINARY_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE_URL.to_string()),
            delivery_base_url: env_optional("CLOUDINARY_DELIVERY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_DELIVERY_BASE_URL.to_string()),
            upload_timeout_secs: env_parse("MEDIA_UPLOAD_TIMEOUT_SECS", MEDIA_UPLOAD_TIMEOUT_SECS),
        };

        let auth = AuthConfig {
            jwks_url: env_optional("AUTH_JWKS_URL"),
            jwt_secret: env_optional("AUTH_JWT_SECRET"),
            issuer: env_optional("AUTH_ISSUER"),
        };

        Ok(AppConfig {
            base,
            database_url,
            cloudinary,
            auth,
            max_image_size_bytes: env_parse("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB) * 1024 * 1024,
            max_video_size_bytes: env_parse("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB) * 1024 * 1024,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match (&self.auth.jwks_url, &self.auth.jwt_secret) {
            (None, None) => {
                return Err(anyhow::anyhow!(
                    "Either AUTH_JWKS_URL or AUTH_JWT_SECRET must be set"
                ))
            }
            (Some(_), Some(_)) => {
                return Err(anyhow::anyhow!(
                    "AUTH_JWKS_URL and AUTH_JWT_SECRET are mutually exclusive"
                ))
            }
            (None, Some(secret)) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(anyhow::anyhow!(
                    "AUTH_JWT_SECRET must be at least {} characters long",
                    MIN_JWT_SECRET_LEN
                ))
            }
            _ => {}
        }

        if self.max_image_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_MB and MAX_VIDEO_SIZE_MB must be greater than zero"
            ));
        }

        Ok(())
    }
}
