//! Error types for the store module.

use embargo_kernel_core::{GroupId, ResourceId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The container has no authorization record at all.
    #[error("container not found: {0}")]
    ContainerNotFound(ResourceId),

    /// A group id referenced by a policy does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The group name is already registered.
    #[error("group already exists: {0}")]
    GroupExists(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
