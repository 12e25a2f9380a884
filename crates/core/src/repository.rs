//! Error type shared by every repository trait.

use thiserror::Error;

/// Failure reported by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A write collided with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed or is unavailable.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Create a storage failure.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a conflict error.
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
