use thiserror::Error;

/// Everything that can go wrong between picking a file and showing a label.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    /// Network failure, timeout, or a body that could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but not with a usable JSON object.
    #[error("unusable response: {0}")]
    Decode(String),

    /// The endpoint reported an application-level failure.
    #[error("classification rejected: {0}")]
    Remote(String),
}

impl ClassifyError {
    /// True when the failure came from the remote service itself rather than the wire.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClassifyError::Remote(_))
    }
}

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;
