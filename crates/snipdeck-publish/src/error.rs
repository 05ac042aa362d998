//! Error types for the publishing pipeline.

use thiserror::Error;

/// Errors that can occur while publishing assets.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Failed to write the asset or deploy log
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to record the deploy in the manifest
    #[error("Manifest error: {0}")]
    Manifest(#[from] snipdeck_manifest::ManifestError),

    /// The publish target rejected the asset
    #[error("Deploy failed: {message}")]
    Failed {
        /// Description of what went wrong
        message: String,
    },

    /// The publish did not finish within the caller's deadline
    #[error("Deploy timed out after {seconds}s")]
    TimedOut {
        /// The deadline that elapsed
        seconds: u64,
    },
}

/// Result type alias for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;
