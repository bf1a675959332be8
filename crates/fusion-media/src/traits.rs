//! Media host abstraction
//!
//! Every hosted media backend implements [`MediaHost`].

use async_trait::async_trait;
use fusion_core::transform_url::DeliveryUrlBuilder;
use fusion_core::MediaKind;
use thiserror::Error;

pub const IMAGE_UPLOAD_FOLDER: &str = "image-uploads";
pub const VIDEO_UPLOAD_FOLDER: &str = "video-uploads";

/// Media host operation errors
#[derive(Debug, Error)]
pub enum MediaHostError {
    #[error("Media host not configured: {0}")]
    NotConfigured(String),

    #[error("Media host rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Destroy failed: {0}")]
    DestroyFailed(String),

    #[error("Invalid response from media host: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for media host operations
pub type MediaHostResult<T> = Result<T, MediaHostError>;

/// Where and how an upload is stored on the media host
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub resource_type: MediaKind,
    pub folder: String,
    /// Incoming transformation applied before the asset is stored
    pub transformation: Option<String>,
    /// Original file name, forwarded for content sniffing
    pub filename: Option<String>,
}

impl UploadOptions {
    pub fn image() -> Self {
        Self {
            resource_type: MediaKind::Image,
            folder: IMAGE_UPLOAD_FOLDER.to_string(),
            transformation: None,
            filename: None,
        }
    }

    pub fn video() -> Self {
        Self {
            resource_type: MediaKind::Video,
            folder: VIDEO_UPLOAD_FOLDER.to_string(),
            transformation: Some(
                DeliveryUrlBuilder::new()
                    .quality_auto()
                    .format("mp4")
                    .to_transformation(),
            ),
            filename: None,
        }
    }

    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::image(),
            MediaKind::Video => Self::video(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Metadata reported by the media host for a stored asset
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAsset {
    pub public_id: String,
    /// Stored size after any incoming transformation
    pub bytes: i64,
    /// Reported for audio and video only
    pub duration: Option<f64>,
    pub secure_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
}

/// Hosted media-processing backend
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Fails with [`MediaHostError::NotConfigured`] when credentials are missing.
    fn ensure_configured(&self) -> MediaHostResult<()>;

    /// Upload a payload and wait for the host to finish storing it.
    async fn upload(&self, data: Vec<u8>, options: &UploadOptions) -> MediaHostResult<UploadedAsset>;

    /// Remove a stored asset. Removing an asset that no longer exists succeeds.
    async fn destroy(&self, public_id: &str, resource_type: MediaKind) -> MediaHostResult<()>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
