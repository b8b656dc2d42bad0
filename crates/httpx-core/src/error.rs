//! Error types for httpx core.

use thiserror::Error;

/// Boxed error type accepted from handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while encoding a response body.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// JSON serialization failed.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// XML serialization failed.
    #[error("failed to encode XML: {0}")]
    Xml(String),
}

impl EncodeError {
    /// Creates an XML encoding error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}
