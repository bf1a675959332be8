//! Client-side upload flows.
//!
//! Both flows are plain state machines: transitions are synchronous methods, and the
//! single network call each flow makes is wrapped in an async convenience method that
//! takes the [`ApiClient`](crate::ApiClient). Callers that drive their own I/O can use
//! the transition methods directly.

pub mod generative_fill;
pub mod video_form;

pub use generative_fill::{Download, FillState, GenerativeFillFlow, SelectedImage};
pub use video_form::{VideoSubmission, VideoUploadForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message surfaced to the user after a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
