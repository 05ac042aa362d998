//! Error types for Snipdeck core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the snippet domain.
#[derive(Debug, Error)]
pub enum Error {
    /// A snippet draft failed validation.
    #[error("Invalid snippet: {message}")]
    InvalidSnippet {
        /// Description of what was rejected.
        message: String,
    },

    /// An unrecognized snippet kind name.
    #[error("Unknown snippet kind: {value}")]
    UnknownKind {
        /// The name that matched no kind.
        value: String,
    },

    /// An unrecognized injection location name.
    #[error("Unknown location: {value}")]
    UnknownLocation {
        /// The name that matched no location.
        value: String,
    },

    /// An unrecognized page scope name.
    #[error("Unknown page scope: {value}")]
    UnknownPageScope {
        /// The name that matched no page scope.
        value: String,
    },

    /// A group key string that does not parse as kind-location-pages.
    #[error("Invalid group key: {value}")]
    InvalidGroupKey {
        /// The rejected key string.
        value: String,
    },
}
