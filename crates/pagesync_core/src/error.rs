//! Error types for PageSync core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PageSync core operations.
///
/// Domain no-ops (selecting an unknown id, deselecting an unselected one,
/// a digest mismatch) are not errors and never surface here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Unknown reorder policy name.
    #[error("unknown reorder policy: {0} (expected 'append' or 'truncate')")]
    UnknownReorderPolicy(String),

    /// Unknown digest algorithm name.
    #[error("unknown digest algorithm: {0} (expected 'sha1' or 'sha256')")]
    UnknownDigestAlgorithm(String),
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
