//! Report generation service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, TryStreamExt, stream};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use tutorbill_shared::{BillingConfig, YearMonth};
use uuid::Uuid;

use super::error::ReportError;
use super::sorting::compare_lines;
use super::types::{
    Abonos, BonusDetail, MonthlyTracker, ProfessorReport, ReportSubtotal, TrackerSummary,
};
use crate::attendance::{AttendanceAggregator, AttendanceRepository};
use crate::billing::{BillingCalculator, LineFigures, ReportLine};
use crate::enrollment::{
    BonusStatus, Enrollment, EnrollmentWindowPolicy, Plan, Professor, ProfessorBonus,
    ProfessorType,
};
use crate::repository::RepositoryError;

/// Repository trait for report inputs and the monthly tracker.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ReportRepository: Send + Sync {
    /// Find a professor by ID.
    fn find_professor(
        &self,
        professor_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Professor>, RepositoryError>> + Send;

    /// List every professor.
    fn list_professors(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Professor>, RepositoryError>> + Send;

    /// Find active enrollments of a professor that belong to `month` under `policy`.
    fn find_active_enrollments(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
        policy: EnrollmentWindowPolicy,
    ) -> impl std::future::Future<Output = Result<Vec<Enrollment>, RepositoryError>> + Send;

    /// Find a plan by ID.
    fn find_plan(
        &self,
        plan_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Plan>, RepositoryError>> + Send;

    /// Find a professor type by ID.
    fn find_professor_type(
        &self,
        type_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ProfessorType>, RepositoryError>> + Send;

    /// Find active bonuses of a professor for `month`.
    fn find_active_bonuses(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
    ) -> impl std::future::Future<Output = Result<Vec<ProfessorBonus>, RepositoryError>> + Send;

    /// Store a monthly tracker. Fails with `RepositoryError::Conflict` if one
    /// already exists for the month.
    fn save_monthly_tracker(
        &self,
        tracker: &MonthlyTracker,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Report generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Professor reported separately from the general report.
    pub special_professor_id: Option<Uuid>,
    /// Enrollment month inclusion rule.
    pub window_policy: EnrollmentWindowPolicy,
    /// Maximum enrollments aggregated concurrently.
    pub concurrency: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            special_professor_id: None,
            window_policy: EnrollmentWindowPolicy::default(),
            concurrency: 8,
        }
    }
}

impl ReportSettings {
    /// Builds settings from the billing configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidConfiguration` for an unknown window policy.
    pub fn from_config(config: &BillingConfig) -> Result<Self, ReportError> {
        let window_policy = config
            .enrollment_window
            .parse()
            .map_err(ReportError::InvalidConfiguration)?;

        Ok(Self {
            special_professor_id: config.special_professor_id,
            window_policy,
            concurrency: config.report_concurrency.max(1),
        })
    }
}

/// Enrollment paired with the plan it bills against.
type Candidate<'a> = (&'a Enrollment, &'a Plan);

/// Service for generating professor payment reports.
pub struct ReportService<R> {
    repo: Arc<R>,
    settings: ReportSettings,
}

impl<R: ReportRepository + AttendanceRepository> ReportService<R> {
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>, settings: ReportSettings) -> Self {
        Self { repo, settings }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Generates the report of one professor for a `YYYY-MM` month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` for a malformed month,
    /// `ReportError::ProfessorNotFound` for an unknown professor, and
    /// `ReportError::Repository` if the store fails.
    pub async fn generate_report(
        &self,
        professor_id: Uuid,
        month: &str,
    ) -> Result<ProfessorReport, ReportError> {
        let month: YearMonth = month.parse()?;
        self.build_report(professor_id, &month).await
    }

    /// Generates the report of the configured special professor.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::SpecialProfessorNotConfigured` when no special
    /// professor is set, otherwise the same errors as `generate_report`.
    pub async fn generate_special_report(
        &self,
        month: &str,
    ) -> Result<ProfessorReport, ReportError> {
        let professor_id = self
            .settings
            .special_professor_id
            .ok_or(ReportError::SpecialProfessorNotConfigured)?;
        self.generate_report(professor_id, month).await
    }

    /// Generates one report per professor, excluding the special professor.
    ///
    /// Professors with neither lines nor bonuses are left out.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` for a malformed month and
    /// `ReportError::Repository` if the store fails.
    pub async fn generate_general_report(
        &self,
        month: &str,
    ) -> Result<Vec<ProfessorReport>, ReportError> {
        let month: YearMonth = month.parse()?;
        self.build_general_report(&month).await
    }

    /// Builds the monthly tracker snapshot: general report, special report
    /// (when configured), the supplied excedents, and a summary.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` for a malformed month and
    /// `ReportError::Repository` if the store fails.
    pub async fn build_monthly_snapshot(
        &self,
        month: &str,
        excedents: Option<serde_json::Value>,
    ) -> Result<MonthlyTracker, ReportError> {
        let month: YearMonth = month.parse()?;

        let report = self.build_general_report(&month).await?;
        let special_professor_report = match self.settings.special_professor_id {
            Some(id) => Some(self.build_report(id, &month).await?),
            None => None,
        };
        let summary = TrackerSummary::from_reports(&report);

        info!(
            month = %month,
            professors = summary.professors,
            lines = summary.lines,
            special = special_professor_report.is_some(),
            "Monthly snapshot built"
        );

        Ok(MonthlyTracker {
            month,
            record_special: special_professor_report.is_some(),
            report,
            special_professor_report,
            excedents,
            summary,
            date_report: Utc::now(),
        })
    }

    /// Stores a monthly tracker. Trackers are write-once per month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::TrackerAlreadyExists` if the month was already
    /// stored and `ReportError::Repository` for other store failures.
    pub async fn save_monthly_snapshot(&self, tracker: &MonthlyTracker) -> Result<(), ReportError> {
        match self.repo.save_monthly_tracker(tracker).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::Conflict(_)) => {
                Err(ReportError::TrackerAlreadyExists(tracker.month))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn build_general_report(
        &self,
        month: &YearMonth,
    ) -> Result<Vec<ProfessorReport>, ReportError> {
        let professors = self.repo.list_professors().await?;
        let mut reports = Vec::with_capacity(professors.len());

        for professor in professors {
            if Some(professor.id) == self.settings.special_professor_id {
                continue;
            }
            let report = self.build_for(&professor, month).await?;
            if report.is_empty() {
                debug!(professor_id = %professor.id, "Skipping professor with empty report");
                continue;
            }
            reports.push(report);
        }

        Ok(reports)
    }

    /// Builds the report of one professor for a parsed month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::ProfessorNotFound` for an unknown professor and
    /// `ReportError::Repository` if the store fails.
    pub async fn build_report(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
    ) -> Result<ProfessorReport, ReportError> {
        let professor = self
            .repo
            .find_professor(professor_id)
            .await?
            .ok_or(ReportError::ProfessorNotFound(professor_id))?;

        self.build_for(&professor, month).await
    }

    async fn build_for(
        &self,
        professor: &Professor,
        month: &YearMonth,
    ) -> Result<ProfessorReport, ReportError> {
        let professor_type = self.load_professor_type(professor).await?;
        let policy = self.settings.window_policy;

        let enrollments: Vec<Enrollment> = self
            .repo
            .find_active_enrollments(professor.id, month, policy)
            .await?
            .into_iter()
            .filter(|e| e.is_active() && policy.includes(e.start_date, e.end_date, month))
            .collect();

        let plans = self.load_plans(&enrollments).await?;

        let candidates: Vec<Candidate<'_>> = enrollments
            .iter()
            .filter_map(|e| match plans.get(&e.plan_id).and_then(Option::as_ref) {
                Some(plan) => Some((e, plan)),
                None => {
                    warn!(
                        enrollment_id = %e.id,
                        plan_id = %e.plan_id,
                        "Skipping enrollment without plan"
                    );
                    None
                }
            })
            .collect();

        let mut rows = self
            .compute_rows(&candidates, professor_type.as_ref(), month)
            .await?;
        rows.sort_by(|(a, _), (b, _)| compare_lines(a, b));

        let subtotal = Self::subtotal(rows.iter().map(|(_, f)| f));
        let abonos = self.load_abonos(professor.id, month).await?;
        let grand_total_payment = subtotal.payment + abonos.total;

        if rows.is_empty() {
            info!(
                professor_id = %professor.id,
                month = %month,
                "No billable enrollments for month"
            );
        }

        Ok(ProfessorReport {
            professor_id: professor.id,
            professor_name: professor.name.clone(),
            month: *month,
            date_range_label: month.range_label(),
            lines: rows.into_iter().map(|(line, _)| line).collect(),
            subtotal,
            abonos,
            grand_total_payment,
        })
    }

    async fn load_professor_type(
        &self,
        professor: &Professor,
    ) -> Result<Option<ProfessorType>, ReportError> {
        let Some(type_id) = professor.professor_type_id else {
            warn!(professor_id = %professor.id, "Professor has no type, paying at zero rate");
            return Ok(None);
        };

        let professor_type = self.repo.find_professor_type(type_id).await?;
        if professor_type.is_none() {
            warn!(
                professor_id = %professor.id,
                professor_type_id = %type_id,
                "Professor type not found, paying at zero rate"
            );
        }
        Ok(professor_type)
    }

    async fn load_plans(
        &self,
        enrollments: &[Enrollment],
    ) -> Result<HashMap<Uuid, Option<Plan>>, ReportError> {
        let mut plans = HashMap::new();
        for enrollment in enrollments {
            if !plans.contains_key(&enrollment.plan_id) {
                let plan = self.repo.find_plan(enrollment.plan_id).await?;
                plans.insert(enrollment.plan_id, plan);
            }
        }
        Ok(plans)
    }

    /// Aggregates attendance and computes one line per candidate.
    ///
    /// Reads run concurrently up to the configured limit; output keeps input order.
    async fn compute_rows(
        &self,
        candidates: &[Candidate<'_>],
        professor_type: Option<&ProfessorType>,
        month: &YearMonth,
    ) -> Result<Vec<(ReportLine, LineFigures)>, ReportError> {
        let repo = &*self.repo;

        stream::iter(candidates.iter().copied())
            .map(|(enrollment, plan)| async move {
                let attendance = AttendanceAggregator::aggregate(repo, enrollment.id, month).await?;
                let figures = BillingCalculator::compute_figures(
                    enrollment,
                    Some(plan),
                    professor_type,
                    attendance.hours_seen,
                    attendance.total_normal_classes,
                );
                debug!(
                    enrollment_id = %enrollment.id,
                    hours_seen = %attendance.hours_seen,
                    total = %figures.total,
                    "Computed report line"
                );
                let line = BillingCalculator::present(enrollment, Some(plan), &figures);
                Ok::<_, ReportError>((line, figures))
            })
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn load_abonos(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
    ) -> Result<Abonos, ReportError> {
        let bonuses = self.repo.find_active_bonuses(professor_id, month).await?;
        let active: Vec<&ProfessorBonus> = bonuses
            .iter()
            .filter(|b| b.status == BonusStatus::Active && b.month == *month)
            .collect();

        Ok(Abonos {
            total: active.iter().map(|b| b.amount).sum::<Decimal>().round_dp(2),
            details: active.into_iter().map(BonusDetail::from).collect(),
        })
    }

    fn subtotal<'a>(figures: impl Iterator<Item = &'a LineFigures>) -> ReportSubtotal {
        let raw = figures.fold(ReportSubtotal::default(), |mut acc, f| {
            acc.total += f.total;
            acc.balance_remaining += f.balance_remaining;
            acc.payment += f.payment;
            acc
        });

        ReportSubtotal {
            total: raw.total.round_dp(2),
            balance_remaining: raw.balance_remaining.round_dp(2),
            payment: raw.payment.round_dp(2),
        }
    }
}
