//! Upload payload validation shared by the server and the client flows.

use std::fmt;

/// Largest video the upload form accepts (70 MB).
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 70 * 1024 * 1024;

/// Kind of media being uploaded. Decides the size cap and the hosted-service preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,
}

impl ValidationError {
    /// Message shown to end users, e.g. "File size exceeds maximum limit (70MB)".
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::FileTooLarge { max, .. } => format!(
                "File size exceeds maximum limit ({}MB)",
                max / (1024 * 1024)
            ),
            ValidationError::EmptyFile => "File is empty".to_string(),
        }
    }
}

/// Size validator for one media kind.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    kind: MediaKind,
    max_size: usize,
}

impl UploadValidator {
    pub fn new(kind: MediaKind, max_size: usize) -> Self {
        Self { kind, max_size }
    }

    /// The validator the video upload form uses.
    pub fn video_form() -> Self {
        Self::new(MediaKind::Video, MAX_VIDEO_UPLOAD_BYTES)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn validate_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_inclusive() {
        let validator = UploadValidator::video_form();
        assert!(validator.validate_size(MAX_VIDEO_UPLOAD_BYTES).is_ok());
        assert_eq!(
            validator.validate_size(MAX_VIDEO_UPLOAD_BYTES + 1),
            Err(ValidationError::FileTooLarge {
                size: MAX_VIDEO_UPLOAD_BYTES + 1,
                max: MAX_VIDEO_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn test_empty_file_rejected() {
        let validator = UploadValidator::new(MediaKind::Image, 10);
        assert_eq!(validator.validate_size(0), Err(ValidationError::EmptyFile));
    }

    #[test]
    fn test_user_message_reports_limit_in_megabytes() {
        let err = UploadValidator::video_form()
            .validate_size(MAX_VIDEO_UPLOAD_BYTES * 2)
            .unwrap_err();
        assert_eq!(err.user_message(), "File size exceeds maximum limit (70MB)");
    }
}
