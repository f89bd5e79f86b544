//! # Galaxy Error Types

use thiserror::Error;

/// Errors that can occur opening the galaxy map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalaxyError {
    /// The density bitmap could not be read or decoded.
    #[error("could not open galaxy bitmap {path}: {reason}")]
    MissingBitmap {
        /// Path that was tried.
        path: String,
        /// Underlying I/O or decode error.
        reason: String,
    },

    /// Pixel data does not match the stated dimensions.
    #[error("invalid galaxy bitmap: {0}")]
    InvalidBitmap(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for galaxy operations.
pub type GalaxyResult<T> = Result<T, GalaxyError>;
