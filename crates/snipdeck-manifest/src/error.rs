//! Error types for manifest management.

use std::io;
use thiserror::Error;

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur while reading or writing the deploy manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
