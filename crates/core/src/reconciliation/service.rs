//! Balance reconciler.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::directives::collect_directives;
use super::error::ReconcileError;
use super::types::{
    BalanceDirective, BalanceSource, BalanceUpdate, DirectiveFailure, ReconciliationInput,
    ReconciliationResult,
};
use crate::enrollment::Enrollment;
use crate::repository::RepositoryError;

/// Repository trait for enrollment balance reads and writes.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BalanceRepository: Send + Sync {
    /// Find an enrollment by ID.
    fn find_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Enrollment>, RepositoryError>> + Send;

    /// Assign an enrollment's balance. Returns `None` if the enrollment does not exist.
    fn update_enrollment_balance(
        &self,
        enrollment_id: Uuid,
        new_balance: Decimal,
    ) -> impl std::future::Future<Output = Result<Option<Enrollment>, RepositoryError>> + Send;
}

/// Applies report fragments to enrollment balances in priority order.
///
/// Tiers run strictly one after another (report, special professor report,
/// excedents) and directives within a tier run in document order, so the
/// last write for an enrollment always comes from the highest-priority
/// fragment naming it. There is no transaction: completed writes stay in
/// place if a later directive fails.
pub struct BalanceReconciler<R> {
    repo: Arc<R>,
}

impl<R: BalanceRepository> BalanceReconciler<R> {
    /// Create a new reconciler.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Reconciles the three optional fragments.
    pub async fn reconcile_balances(
        &self,
        report: Option<serde_json::Value>,
        special_professor_report: Option<serde_json::Value>,
        excedents: Option<serde_json::Value>,
    ) -> ReconciliationResult {
        self.apply_reconciliation(&ReconciliationInput {
            report,
            special_professor_report,
            excedents,
        })
        .await
    }

    /// Applies every directive of `input`, lowest priority tier first.
    ///
    /// Never fails: each directive's outcome is recorded in the returned tally.
    pub async fn apply_reconciliation(&self, input: &ReconciliationInput) -> ReconciliationResult {
        let mut result = ReconciliationResult::default();

        for source in BalanceSource::TIERS {
            let Some(fragment) = input.fragment(source) else {
                continue;
            };

            for item in collect_directives(fragment) {
                match item {
                    Ok(directive) => match self.apply(directive, source).await {
                        Ok(update) => result.updated.push(update),
                        Err(error) => {
                            result.errors.push(Self::failure(
                                directive.enrollment_id.to_string(),
                                source,
                                &error,
                            ));
                        }
                    },
                    Err(rejected) => {
                        result
                            .errors
                            .push(Self::failure(rejected.raw_id, source, &rejected.error));
                    }
                }
            }
        }

        info!(
            updated = result.updated.len(),
            errors = result.errors.len(),
            "Balance reconciliation finished"
        );

        result
    }

    async fn apply(
        &self,
        directive: BalanceDirective,
        source: BalanceSource,
    ) -> Result<BalanceUpdate, ReconcileError> {
        let id = directive.enrollment_id;

        let current = self
            .repo
            .find_enrollment(id)
            .await?
            .ok_or(ReconcileError::EnrollmentNotFound(id))?;

        let updated = self
            .repo
            .update_enrollment_balance(id, directive.new_balance)
            .await?
            .ok_or(ReconcileError::EnrollmentNotFound(id))?;

        Ok(BalanceUpdate {
            enrollment_id: id,
            old_balance: current.balance,
            new_balance: updated.balance,
            source,
        })
    }

    fn failure(
        enrollment_id: String,
        source: BalanceSource,
        error: &ReconcileError,
    ) -> DirectiveFailure {
        warn!(
            enrollment_id = %enrollment_id,
            source = %source,
            error = %error,
            "Balance directive failed"
        );
        DirectiveFailure {
            enrollment_id,
            source,
            message: error.to_string(),
        }
    }
}
