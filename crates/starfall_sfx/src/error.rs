//! # Effect Error Types
//!
//! Running out of slots is not an error: a spawn into a full pool is dropped.
//! Errors only come from reading saves and loading configuration.

use thiserror::Error;

/// Errors that can occur in the effect system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SfxError {
    /// The save stream does not describe a valid effect pool.
    #[error("corrupt effect state at byte {offset}: {reason}")]
    CorruptState {
        /// Byte offset into the stream where the problem was found.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SfxError {
    /// Shorthand for a [`SfxError::CorruptState`].
    pub(crate) fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result type for effect operations.
pub type SfxResult<T> = Result<T, SfxError>;
