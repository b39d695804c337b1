//! Error types for the Embargo Kernel.

use embargo_kernel_policy::PolicyError;
use embargo_kernel_store::StoreError;
use thiserror::Error;

/// Errors that can occur while applying an embargo.
#[derive(Debug, Error)]
pub enum EmbargoError {
    /// Decision error.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Storage error while persisting a directive.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration parsed but is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// I/O error reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Embargo Kernel operations.
pub type Result<T> = std::result::Result<T, EmbargoError>;
