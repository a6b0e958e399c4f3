use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),

    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unsupported sharpen method '{0}'. Supported methods: sharpen, unsharp")]
    UnsupportedSharpenMethod(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
