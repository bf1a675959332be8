use fusion_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("File size exceeds maximum limit ({}MB)", .max / (1024 * 1024))]
    FileTooLarge { size: usize, max: usize },

    #[error("File is empty")]
    EmptyFile,

    /// Non-success response; `message` and `code` come from the server's error body when present.
    #[error("API request failed with status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { size, max } => ClientError::FileTooLarge { size, max },
            ValidationError::EmptyFile => ClientError::EmptyFile,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
