//! Command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tutorbill_core::enrollment::PenalizationStatus;
use tutorbill_core::reconciliation::{BalanceReconciler, ReconciliationInput, ReconciliationResult};
use tutorbill_core::reports::{MonthlyTracker, ProfessorReport, ReportError, ReportService};
use tutorbill_db::{BillingRepository, PenalizationChange};
use tutorbill_shared::{AppError, YearMonth};
use uuid::Uuid;

/// Failure of a command, classified for the exit status.
#[derive(Debug)]
pub enum CommandError {
    /// Domain error with an application error code.
    App(AppError),
    /// Anything else (I/O, malformed input files).
    Other(anyhow::Error),
}

impl From<ReportError> for CommandError {
    fn from(err: ReportError) -> Self {
        Self::App(err.into())
    }
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

/// Shared state for every command.
pub struct App {
    /// Database-backed repository.
    pub repo: Arc<BillingRepository>,
    /// Report service over `repo`.
    pub reports: ReportService<BillingRepository>,
}

impl App {
    pub async fn report(
        &self,
        professor_id: Uuid,
        month: &str,
    ) -> Result<ProfessorReport, CommandError> {
        Ok(self.reports.generate_report(professor_id, month).await?)
    }

    pub async fn special_report(&self, month: &str) -> Result<ProfessorReport, CommandError> {
        Ok(self.reports.generate_special_report(month).await?)
    }

    pub async fn general_report(&self, month: &str) -> Result<Vec<ProfessorReport>, CommandError> {
        let reports = self.reports.generate_general_report(month).await?;
        info!(month, professors = reports.len(), "General report generated");
        Ok(reports)
    }

    pub async fn snapshot(
        &self,
        month: &str,
        excedents: Option<&Path>,
        save: bool,
    ) -> Result<MonthlyTracker, CommandError> {
        let excedents = excedents.map(read_json).transpose()?;
        let tracker = self.reports.build_monthly_snapshot(month, excedents).await?;

        if save {
            self.reports.save_monthly_snapshot(&tracker).await?;
            info!(month = %tracker.month, "Monthly snapshot saved");
        }
        Ok(tracker)
    }

    pub async fn reconcile(
        &self,
        input: Option<&Path>,
        tracker: Option<&str>,
    ) -> Result<ReconciliationResult, CommandError> {
        let input = match (input, tracker) {
            (Some(path), _) => serde_json::from_value::<ReconciliationInput>(read_json(path)?)
                .with_context(|| format!("{} is not a reconciliation input", path.display()))?,
            (None, Some(month)) => self.tracker_input(month).await?,
            (None, None) => {
                return Err(AppError::Validation("no reconciliation input given".into()).into());
            }
        };

        let result = BalanceReconciler::new(Arc::clone(&self.repo))
            .apply_reconciliation(&input)
            .await;
        if !result.is_complete() {
            warn!(
                failed = result.errors.len(),
                "Some balance directives were not applied"
            );
        }
        Ok(result)
    }

    pub async fn penalize(
        &self,
        class_id: Uuid,
        status: PenalizationStatus,
    ) -> Result<PenalizationChange, CommandError> {
        self.repo
            .apply_penalization_transition(class_id, status)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Class not found: {class_id}")).into())
    }

    async fn tracker_input(&self, month: &str) -> Result<ReconciliationInput, CommandError> {
        let month: YearMonth = month.parse().map_err(AppError::from)?;
        let tracker = self
            .repo
            .find_monthly_tracker(&month)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("No monthly tracker for {month}")))?;

        tracker_to_input(&tracker)
            .context("tracker could not be re-encoded")
            .map_err(CommandError::from)
    }
}

/// Reconciliation input from a stored snapshot: its general report, special
/// report, and excedents, in that priority.
pub fn tracker_to_input(tracker: &MonthlyTracker) -> anyhow::Result<ReconciliationInput> {
    Ok(ReconciliationInput {
        report: Some(serde_json::to_value(&tracker.report)?),
        special_professor_report: tracker
            .special_professor_report
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?,
        excedents: tracker.excedents.clone(),
    })
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tutorbill_core::reports::TrackerSummary;

    #[test]
    fn test_tracker_to_input_keeps_tiers() {
        let tracker = MonthlyTracker {
            month: YearMonth::new(2024, 3).unwrap(),
            report: Vec::new(),
            special_professor_report: None,
            excedents: Some(serde_json::json!({ "details": [] })),
            summary: TrackerSummary::default(),
            record_special: false,
            date_report: Utc::now(),
        };

        let input = tracker_to_input(&tracker).unwrap();
        assert_eq!(input.report, Some(serde_json::json!([])));
        assert!(input.special_professor_report.is_none());
        assert_eq!(input.excedents, tracker.excedents);
    }

    #[test]
    fn test_read_json_reports_path() {
        let err = read_json(Path::new("/nonexistent/excedents.json")).unwrap_err();
        assert!(err.to_string().contains("excedents.json"));
    }
}
