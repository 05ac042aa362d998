//! Error types for the snippet store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store management.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] snipdeck_core::Error),

    #[error("Snippet not found: {0}")]
    NotFound(Uuid),

    #[error("Import file not found at {0}")]
    ImportNotFound(PathBuf),

    #[error("Home directory not found")]
    HomeNotFound,
}
