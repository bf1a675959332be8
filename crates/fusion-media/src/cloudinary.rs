//! Cloudinary upload API client

use async_trait::async_trait;
use chrono::Utc;
use fusion_core::config::{CloudinaryConfig, CloudinaryCredentials};
use fusion_core::MediaKind;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::signing;
use crate::traits::{MediaHost, MediaHostError, MediaHostResult, UploadOptions, UploadedAsset};

const DEFAULT_FILENAME: &str = "upload";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(default)]
    bytes: i64,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Media host backed by the Cloudinary upload API
pub struct CloudinaryHost {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
}

impl Debug for CloudinaryHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryHost")
            .field("cloud_name", &self.config.cloud_name)
            .field("api_base_url", &self.config.api_base_url)
            .finish()
    }
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> MediaHostResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs.max(1)))
            .build()?;

        if !config.is_configured() {
            tracing::warn!("Cloudinary credentials are not set; uploads will fail until configured");
        }

        Ok(Self {
            http_client,
            config,
        })
    }

    fn credentials(&self) -> MediaHostResult<CloudinaryCredentials> {
        self.config.credentials().map_err(|_| {
            MediaHostError::NotConfigured(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set"
                    .to_string(),
            )
        })
    }

    fn endpoint(&self, cloud_name: &str, resource_type: MediaKind, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            cloud_name,
            resource_type,
            action
        )
    }

    /// Turn a non-success response into a [`MediaHostError::Rejected`].
    async fn rejection(response: reqwest::Response) -> MediaHostError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|envelope| envelope.error.message)
            .unwrap_or(text);
        MediaHostError::Rejected { status, message }
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    fn ensure_configured(&self) -> MediaHostResult<()> {
        self.credentials().map(|_| ())
    }

    #[tracing::instrument(skip(self, data, options), fields(resource_type = %options.resource_type, folder = %options.folder, size = data.len()))]
    async fn upload(&self, data: Vec<u8>, options: &UploadOptions) -> MediaHostResult<UploadedAsset> {
        let credentials = self.credentials()?;

        let mut params: Vec<(&'static str, String)> = vec![
            ("folder", options.folder.clone()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];
        if let Some(transformation) = &options.transformation {
            params.push(("transformation", transformation.clone()));
        }
        let signature = signing::sign(&params, &credentials.api_secret);

        let filename = options
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        let mut form = Form::new()
            .part("file", Part::bytes(data).file_name(filename))
            .text("api_key", credentials.api_key.clone())
            .text("signature", signature);
        for (name, value) in params {
            form = form.text(name, value);
        }

        let url = self.endpoint(&credentials.cloud_name, options.resource_type, "upload");
        let response = self.http_client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            tracing::warn!(error = %err, "Media host rejected upload");
            return Err(err);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaHostError::InvalidResponse(e.to_string()))?;

        if body.public_id.is_empty() {
            return Err(MediaHostError::InvalidResponse(
                "upload response has an empty public_id".to_string(),
            ));
        }

        tracing::info!(
            public_id = %body.public_id,
            bytes = body.bytes,
            duration = ?body.duration,
            "Upload stored on media host"
        );

        Ok(UploadedAsset {
            public_id: body.public_id,
            bytes: body.bytes,
            duration: body.duration,
            secure_url: body.secure_url,
            width: body.width,
            height: body.height,
            format: body.format,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn destroy(&self, public_id: &str, resource_type: MediaKind) -> MediaHostResult<()> {
        let credentials = self.credentials()?;

        let mut params: Vec<(&'static str, String)> = vec![
            ("public_id", public_id.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];
        let signature = signing::sign(&params, &credentials.api_secret);
        params.push(("api_key", credentials.api_key.clone()));
        params.push(("signature", signature));

        let url = self.endpoint(&credentials.cloud_name, resource_type, "destroy");
        let response = self.http_client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaHostError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => {
                tracing::info!(public_id = %public_id, result = %body.result, "Asset removed from media host");
                Ok(())
            }
            other => Err(MediaHostError::DestroyFailed(format!(
                "{}: unexpected result '{}'",
                public_id, other
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }
}
