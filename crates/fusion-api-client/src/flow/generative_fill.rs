//! Generative fill: pick an image, upload it, choose target dimensions and let the
//! media host extend the canvas.

use crate::api::UploadFile;
use crate::error::{ClientError, Result};
use crate::flow::Notification;
use crate::ApiClient;
use fusion_core::transform_url::generative_fill_url;

pub const DOWNLOAD_FILENAME: &str = "generatedImage.png";
const UPLOAD_FAILED: &str = "Failed to upload image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Idle,
    /// A local file is chosen and previewed.
    Selected,
    Uploading,
    /// Uploaded; waiting for transform dimensions.
    Uploaded,
    Transforming,
    /// The generated result is displayed.
    Ready,
}

impl FillState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillState::Idle => "idle",
            FillState::Selected => "selected",
            FillState::Uploading => "uploading",
            FillState::Uploaded => "uploaded",
            FillState::Transforming => "transforming",
            FillState::Ready => "ready",
        }
    }
}

/// A local image with its intrinsic dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub filename: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    pub filename: &'static str,
}

#[derive(Debug)]
pub struct GenerativeFillFlow {
    delivery_base: String,
    cloud_name: String,
    state: FillState,
    image: Option<SelectedImage>,
    public_id: Option<String>,
    width: u32,
    height: u32,
    result_url: Option<String>,
    notification: Option<Notification>,
}

impl GenerativeFillFlow {
    pub fn new(delivery_base: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            delivery_base: delivery_base.into(),
            cloud_name: cloud_name.into(),
            state: FillState::Idle,
            image: None,
            public_id: None,
            width: 0,
            height: 0,
            result_url: None,
            notification: None,
        }
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    fn expect_state(&self, expected: FillState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ClientError::InvalidState {
                action,
                state: self.state.as_str(),
            })
        }
    }

    fn reset(&mut self) {
        self.state = FillState::Idle;
        self.image = None;
        self.public_id = None;
        self.width = 0;
        self.height = 0;
        self.result_url = None;
    }

    /// Choose a new image. Valid from any state; everything from the previous image is dropped.
    pub fn select(&mut self, image: SelectedImage) {
        self.reset();
        self.notification = None;
        self.width = image.width;
        self.height = image.height;
        self.image = Some(image);
        self.state = FillState::Selected;
    }

    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.set_dimensions(width, self.height)
    }

    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.set_dimensions(self.width, height)
    }

    /// Changing a dimension invalidates any generated result.
    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ClientError::InvalidInput(
                "Width and height must be positive".to_string(),
            ));
        }
        self.width = width;
        self.height = height;
        if matches!(self.state, FillState::Transforming | FillState::Ready) {
            self.result_url = None;
            self.state = FillState::Uploaded;
        }
        Ok(())
    }

    /// Move to `Uploading` and hand out the file to send.
    pub fn start_upload(&mut self) -> Result<UploadFile> {
        self.expect_state(FillState::Selected, "upload")?;
        let image = self
            .image
            .as_ref()
            .ok_or(ClientError::InvalidState {
                action: "upload",
                state: "idle",
            })?;
        let file = UploadFile::new(image.filename.clone(), image.data.clone());
        self.state = FillState::Uploading;
        Ok(file)
    }

    pub fn upload_succeeded(&mut self, public_id: impl Into<String>) -> Result<()> {
        self.expect_state(FillState::Uploading, "finish upload")?;
        self.public_id = Some(public_id.into());
        self.state = FillState::Uploaded;
        Ok(())
    }

    /// Back to `Idle` with an error notification. Nothing is retried.
    pub fn upload_failed(&mut self) -> Result<()> {
        self.expect_state(FillState::Uploading, "fail upload")?;
        self.reset();
        self.notification = Some(Notification::error(UPLOAD_FAILED));
        Ok(())
    }

    /// Upload the selected image through the API.
    pub async fn upload(&mut self, client: &ApiClient) -> Result<()> {
        let file = self.start_upload()?;
        match client.upload_image(file).await {
            Ok(response) => self.upload_succeeded(response.public_id),
            Err(e) => {
                tracing::warn!(error = %e, "Image upload failed");
                self.upload_failed()?;
                Err(e)
            }
        }
    }

    /// Build the fill URL for the current dimensions and start showing it.
    pub fn generate(&mut self) -> Result<&str> {
        self.expect_state(FillState::Uploaded, "generate")?;
        let public_id = self.public_id.as_deref().ok_or(ClientError::InvalidState {
            action: "generate",
            state: "uploaded",
        })?;
        let url = generative_fill_url(
            &self.delivery_base,
            &self.cloud_name,
            public_id,
            self.width,
            self.height,
        );
        self.state = FillState::Transforming;
        Ok(self.result_url.insert(url).as_str())
    }

    /// The generated image finished loading.
    pub fn complete(&mut self) -> Result<()> {
        self.expect_state(FillState::Transforming, "complete")?;
        self.state = FillState::Ready;
        Ok(())
    }

    pub fn download(&self) -> Result<Download> {
        self.expect_state(FillState::Ready, "download")?;
        let url = self.result_url.clone().ok_or(ClientError::InvalidState {
            action: "download",
            state: "ready",
        })?;
        Ok(Download {
            url,
            filename: DOWNLOAD_FILENAME,
        })
    }
}
