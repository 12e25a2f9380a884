//! Attendance aggregator.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tutorbill_shared::YearMonth;
use uuid::Uuid;

use super::bucket::fractional_hours;
use super::types::{AttendanceSummary, ClassAttendance, ClassRegistry, ClassRegistryFilter};
use crate::repository::RepositoryError;

/// Repository trait for class attendance reads.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttendanceRepository: Send + Sync {
    /// Find class records of an enrollment matching `filter`.
    fn find_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ClassRegistry>, RepositoryError>> + Send;

    /// Count class records of an enrollment matching `filter`.
    fn count_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Folds class attendance into billable hours.
pub struct AttendanceAggregator;

impl AttendanceAggregator {
    /// Folds reschedule minutes into their original classes and buckets each class.
    ///
    /// Reschedules whose original class is not in `normal` are ignored; they
    /// are attributed only through a normal class in the same window.
    #[must_use]
    pub fn fold(normal: &[ClassRegistry], reschedules: &[ClassRegistry]) -> Vec<ClassAttendance> {
        let mut grouped: HashMap<Uuid, i64> = HashMap::new();
        for reschedule in reschedules {
            if let Some(original) = reschedule.original_class_id {
                *grouped.entry(original).or_default() += i64::from(reschedule.minutes_viewed);
            }
        }

        normal
            .iter()
            .map(|class| {
                let own_minutes = i64::from(class.minutes_viewed);
                let rescheduled_minutes = grouped.get(&class.id).copied().unwrap_or(0);
                ClassAttendance {
                    class_id: class.id,
                    class_date: class.class_date,
                    own_minutes,
                    rescheduled_minutes,
                    hours: fractional_hours(own_minutes + rescheduled_minutes),
                }
            })
            .collect()
    }

    /// Total bucketed hours for the given normal classes and reschedules.
    #[must_use]
    pub fn hours_seen(normal: &[ClassRegistry], reschedules: &[ClassRegistry]) -> Decimal {
        Self::fold(normal, reschedules).iter().map(|c| c.hours).sum()
    }

    /// Loads attendance for an enrollment over `month` and aggregates it.
    ///
    /// Issues two bounded reads (attended normal classes, then their
    /// reschedules) plus one all-time count of normal classes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any read fails.
    pub async fn aggregate<R: AttendanceRepository>(
        repo: &R,
        enrollment_id: Uuid,
        month: &YearMonth,
    ) -> Result<AttendanceSummary, RepositoryError> {
        let (start, end) = (month.first_day(), month.last_day());

        let normal = repo
            .find_class_registry(
                enrollment_id,
                &ClassRegistryFilter::attended_normal(start, end),
            )
            .await?;

        let reschedules = if normal.is_empty() {
            Vec::new()
        } else {
            let ids = normal.iter().map(|c| c.id).collect();
            repo.find_class_registry(
                enrollment_id,
                &ClassRegistryFilter::reschedules_of(start, end, ids),
            )
            .await?
        };

        let total_normal_classes = repo
            .count_class_registry(enrollment_id, &ClassRegistryFilter::all_normal())
            .await?;

        let classes = Self::fold(&normal, &reschedules);
        let hours_seen = classes.iter().map(|c| c.hours).sum();

        Ok(AttendanceSummary {
            hours_seen,
            total_normal_classes,
            classes,
        })
    }
}
