//! Reconciliation error types.

use thiserror::Error;
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Failure of a single balance directive.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Enrollment does not exist.
    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(Uuid),

    /// Directive could not be read from the fragment.
    #[error("Invalid balance directive: {0}")]
    InvalidDirective(String),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ReconcileError {
    /// Create an invalid directive error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDirective(msg.into())
    }
}
