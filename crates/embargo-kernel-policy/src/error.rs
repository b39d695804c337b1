//! Error types for the policy module.

use embargo_kernel_core::NaiveDate;
use thiserror::Error;

/// Errors that can occur while deciding embargo policies.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// An embargo date was supplied without terms. This is an integration
    /// bug in the caller, not a condition to recover from.
    #[error("embargo date {embargo_date} supplied without embargo terms")]
    MissingTerms { embargo_date: NaiveDate },

    /// A collaborator lookup failed.
    #[error("store error: {0}")]
    Store(#[from] embargo_kernel_store::StoreError),
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
