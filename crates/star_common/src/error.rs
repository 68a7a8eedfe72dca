//! Error types for STAR Journal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend request failed: {0}")]
    Upstream(String),

    #[error("Backend returned no usable text")]
    GenerationFailed,

    #[error("Storage degraded: {0}")]
    StorageDegraded(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StarError {
    /// Whether the action can simply be re-triggered by the user.
    /// Configuration problems need fixing first; everything else is a
    /// per-action failure.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StarError::Configuration(_) | StarError::InvalidInput(_))
    }
}
