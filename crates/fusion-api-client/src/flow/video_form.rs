//! Video upload form: file, required title, optional description.

use crate::api::UploadFile;
use crate::error::{ClientError, Result};
use crate::flow::Notification;
use crate::ApiClient;
use fusion_core::models::MediaRecord;
use fusion_core::UploadValidator;

const UPLOAD_SUCCEEDED: &str = "Video uploaded successfully";
const UPLOAD_FAILED: &str = "Failed to upload video";

/// Everything needed for one `POST /api/video-upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSubmission {
    pub file: UploadFile,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct VideoUploadForm {
    validator: UploadValidator,
    file: Option<UploadFile>,
    title: String,
    description: String,
    submitting: bool,
    notification: Option<Notification>,
}

impl Default for VideoUploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoUploadForm {
    pub fn new() -> Self {
        Self {
            validator: UploadValidator::video_form(),
            file: None,
            title: String::new(),
            description: String::new(),
            submitting: false,
            notification: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// Pick a file. An oversized or empty file is refused on the spot and never kept.
    pub fn set_file(&mut self, file: UploadFile) -> Result<()> {
        if let Err(e) = self.validator.validate_size(file.len()) {
            self.notification = Some(Notification::error(e.user_message()));
            self.file = None;
            return Err(e.into());
        }
        self.file = Some(file);
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Validate the form and mark it in flight.
    pub fn begin_submit(&mut self) -> Result<VideoSubmission> {
        if self.submitting {
            return Err(ClientError::InvalidState {
                action: "submit",
                state: "uploading",
            });
        }

        let file = self
            .file
            .clone()
            .ok_or_else(|| ClientError::InvalidInput("No file selected".to_string()))?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::InvalidInput("Title is required".to_string()));
        }
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let submission = VideoSubmission {
            file,
            title: title.to_string(),
            description,
        };
        self.submitting = true;
        Ok(submission)
    }

    /// Record the outcome of a submission. The form is cleared on success and kept on failure.
    pub fn finish_submit(&mut self, outcome: &Result<MediaRecord>) {
        self.submitting = false;
        match outcome {
            Ok(_) => {
                self.file = None;
                self.title.clear();
                self.description.clear();
                self.notification = Some(Notification::success(UPLOAD_SUCCEEDED));
            }
            Err(_) => {
                self.notification = Some(Notification::error(UPLOAD_FAILED));
            }
        }
    }

    pub async fn submit(&mut self, client: &ApiClient) -> Result<MediaRecord> {
        let submission = self.begin_submit()?;
        let outcome = client
            .upload_video(
                submission.file,
                &submission.title,
                submission.description.as_deref(),
            )
            .await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Video upload failed");
        }
        self.finish_submit(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::NotificationKind;
    use fusion_core::MAX_VIDEO_UPLOAD_BYTES;

    fn clip() -> UploadFile {
        UploadFile::new("clip.mp4", vec![0; 16])
    }

    #[test]
    fn test_oversized_file_rejected_synchronously() {
        let mut form = VideoUploadForm::new();
        let err = form
            .set_file(UploadFile::new("big.mp4", vec![0; MAX_VIDEO_UPLOAD_BYTES + 1]))
            .unwrap_err();

        assert!(matches!(err, ClientError::FileTooLarge { .. }));
        assert!(!form.has_file());
        let notification = form.take_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "File size exceeds maximum limit (70MB)");
    }

    #[test]
    fn test_file_at_limit_accepted() {
        let mut form = VideoUploadForm::new();
        form.set_file(UploadFile::new("max.mp4", vec![0; MAX_VIDEO_UPLOAD_BYTES]))
            .unwrap();
        assert!(form.has_file());
    }

    #[test]
    fn test_title_required() {
        let mut form = VideoUploadForm::new();
        form.set_file(clip()).unwrap();
        form.set_title("   ");
        assert!(matches!(form.begin_submit(), Err(ClientError::InvalidInput(msg)) if msg == "Title is required"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_file_required() {
        let mut form = VideoUploadForm::new();
        form.set_title("Holiday");
        assert!(form.begin_submit().is_err());
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let mut form = VideoUploadForm::new();
        form.set_file(clip()).unwrap();
        form.set_title(" Holiday ");
        form.set_description("  ");

        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.title, "Holiday");
        assert_eq!(submission.description, None);
        assert!(form.is_submitting());

        assert!(matches!(
            form.begin_submit(),
            Err(ClientError::InvalidState { action: "submit", .. })
        ));
    }

    #[test]
    fn test_failure_keeps_form() {
        let mut form = VideoUploadForm::new();
        form.set_file(clip()).unwrap();
        form.set_title("Holiday");
        form.begin_submit().unwrap();

        form.finish_submit(&Err(ClientError::InvalidResponse("boom".to_string())));
        assert!(!form.is_submitting());
        assert!(form.has_file());
        assert_eq!(form.take_notification().unwrap().message, "Failed to upload video");
        assert!(form.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_submit_through_api() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/video-upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"7f1f5b7e-0d8e-4a7a-9f57-2f1c0e4b9a11","title":"Holiday","description":null,
                   "publicId":"video-uploads/clip","originalSize":16,"compressedSize":8,
                   "duration":0.0,"createdAt":"2024-06-01T10:00:00Z"}"#,
            )
            .create_async()
            .await;
        let client = ApiClient::new(server.url(), Some("tok".to_string())).unwrap();

        let mut form = VideoUploadForm::new();
        form.set_file(clip()).unwrap();
        form.set_title("Holiday");
        let record = form.submit(&client).await.unwrap();

        assert_eq!(record.external_id, "video-uploads/clip");
        assert!(!form.has_file());
        let notification = form.take_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.message, "Video uploaded successfully");
    }
}
