//! Domain methods for the Fusion API client.

use crate::error::{ClientError, Result};
use crate::ApiClient;
use fusion_core::models::{ImageUploadResponse, MediaRecord};
use fusion_core::UploadValidator;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// A file read into memory, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    /// Read a local file. Paths containing `..` are refused.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(ClientError::InvalidInput(format!(
                "Refusing path with '..': {}",
                path.display()
            )));
        }

        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        Ok(Self { filename, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn into_part(self) -> Part {
        Part::bytes(self.data).file_name(self.filename)
    }
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub media: String,
}

impl ApiClient {
    /// Upload an image; returns the public id assigned by the media host.
    pub async fn upload_image(&self, file: UploadFile) -> Result<ImageUploadResponse> {
        if file.is_empty() {
            return Err(ClientError::EmptyFile);
        }
        let form = Form::new().part("file", file.into_part());
        self.post_multipart("/api/image-upload", form).await
    }

    /// Upload a video with its metadata.
    ///
    /// The 70MB limit is checked before any request is built; an oversized file never
    /// reaches the network.
    pub async fn upload_video(
        &self,
        file: UploadFile,
        title: &str,
        description: Option<&str>,
    ) -> Result<MediaRecord> {
        UploadValidator::video_form().validate_size(file.len())?;

        let mut form = Form::new()
            .text("title", title.to_string())
            .text("originalSize", file.len().to_string());
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }
        let form = form.part("file", file.into_part());

        self.post_multipart("/api/video-upload", form).await
    }

    /// All videos, newest first.
    pub async fn list_videos(&self) -> Result<Vec<MediaRecord>> {
        self.get("/api/videos").await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("/api/health").await
    }
}
