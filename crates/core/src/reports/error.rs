//! Report error types.

use thiserror::Error;
use tutorbill_shared::{AppError, MonthError, YearMonth};
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Month string is not a valid `YYYY-MM`.
    #[error("Invalid month: {0}")]
    InvalidMonth(#[from] MonthError),

    /// Professor not found.
    #[error("Professor not found: {0}")]
    ProfessorNotFound(Uuid),

    /// A special report was requested but no special professor is configured.
    #[error("No special professor is configured")]
    SpecialProfessorNotConfigured,

    /// Configuration value could not be understood.
    #[error("Invalid billing configuration: {0}")]
    InvalidConfiguration(String),

    /// A tracker for this month was already stored.
    #[error("Monthly tracker already exists for {0}")]
    TrackerAlreadyExists(YearMonth),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidMonth(_) => Self::Validation(err.to_string()),
            ReportError::ProfessorNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::SpecialProfessorNotConfigured => Self::BusinessRule(err.to_string()),
            ReportError::InvalidConfiguration(_) => Self::Internal(err.to_string()),
            ReportError::TrackerAlreadyExists(_) => Self::Conflict(err.to_string()),
            ReportError::Repository(_) => Self::Database(err.to_string()),
        }
    }
}
