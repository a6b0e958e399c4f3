use std::io;
use std::path::PathBuf;
use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("File not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read image: {message}")]
    EncodeError { message: String },

    #[error("API request failed: {message}")]
    NetworkError { message: String },

    #[error("Segmentation service responded with status {status}: {message}")]
    RemoteError { status: u16, message: String },

    #[error("Failed to process API response: {message}")]
    ProtocolError { message: String },

    #[error("Failed to decode API response: {message}")]
    DecodeError { message: String },

    #[error("Failed to save image: {message}")]
    WriteError { message: String },

    #[error("Failed to composite image: {message}")]
    CompositionError { message: String },

    #[error("Conflicting request: {message}")]
    ConflictingRequest { message: String },

    #[error("Invalid image payload: {message}")]
    InvalidPayload { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Task error: {message}")]
    TaskError { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl AppError {
    /// True for failures caused by the caller rather than by this service or
    /// its collaborators.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Domain(_)
                | Self::InputNotFound { .. }
                | Self::ConflictingRequest { .. }
                | Self::InvalidPayload { .. }
                | Self::ValidationError { .. }
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
