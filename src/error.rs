//! Error types for dominant color extraction.

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, QuantizeError>;

#[derive(Error, Debug)]
pub enum QuantizeError {
    /// Malformed input to the clusterer or grid constructor. Never retried:
    /// the caller drops the image and moves on.
    #[error("Invalid argument: {parameter} ({reason})")]
    InvalidArgument { parameter: String, reason: String },

    #[error("Unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Unable to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuantizeError {
    pub fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// True for precondition violations raised by the core itself.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, QuantizeError::InvalidArgument { .. })
    }
}
