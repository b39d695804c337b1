//! Error types for the Embargo Kernel Core.

use thiserror::Error;

/// Core errors raised while interpreting raw values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid embargo date {input:?}: {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
