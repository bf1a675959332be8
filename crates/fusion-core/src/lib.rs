//! Fusion Core Library
//!
//! Domain models, error types, configuration, upload validation and delivery
//! URL building shared by the server, the API client and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod transform_url;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, AuthConfig, BaseConfig, CloudinaryConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ImageUploadResponse, MediaRecord, NewMediaRecord};
pub use transform_url::{DeliveryUrlBuilder, SocialFormat};
pub use validation::{MediaKind, UploadValidator, ValidationError, MAX_VIDEO_UPLOAD_BYTES};
