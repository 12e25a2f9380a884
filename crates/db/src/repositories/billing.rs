//! Billing repository for database operations.
//!
//! Implements the attendance, report, and balance repository traits from
//! `tutorbill-core` using `SeaORM`.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};
use tutorbill_core::RepositoryError;
use tutorbill_core::attendance::{
    AttendanceRepository, ClassKind, ClassRegistry, ClassRegistryFilter, RescheduleState,
};
use tutorbill_core::enrollment::{
    BonusStatus, Enrollment, EnrollmentStatus, EnrollmentWindowPolicy, PenalizationStatus, Plan,
    Professor, ProfessorBonus, ProfessorType, StudentRef, penalization_delta,
};
use tutorbill_core::reconciliation::BalanceRepository;
use tutorbill_core::reports::{MonthlyTracker, ReportRepository};
use tutorbill_shared::YearMonth;
use uuid::Uuid;

use super::convert::{
    bonus_status_to_db, enrollment_status_to_db, penalization_status_from_db,
    penalization_status_to_db, to_bonus, to_class_registry, to_enrollment, to_plan,
    to_professor, to_professor_type,
};
use crate::entities::{
    class_registries, enrollment_students, enrollments, monthly_trackers, plans,
    professor_bonuses, professor_types, professors, students,
};

/// Result of a penalization status change on one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenalizationChange {
    /// Class record changed.
    pub class_id: Uuid,
    /// Enrollment whose counter moved.
    pub enrollment_id: Uuid,
    /// Status before the change.
    pub from: PenalizationStatus,
    /// Status after the change.
    pub to: PenalizationStatus,
    /// Counter delta applied.
    pub delta: i32,
    /// Counter value after the change.
    pub penalization_count: i32,
}

/// Billing repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads a stored monthly tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the payload cannot be decoded.
    pub async fn find_monthly_tracker(
        &self,
        month: &YearMonth,
    ) -> Result<Option<MonthlyTracker>, RepositoryError> {
        let Some(model) = monthly_trackers::Entity::find()
            .filter(monthly_trackers::Column::Month.eq(month.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        serde_json::from_value(model.payload)
            .map(Some)
            .map_err(|e| RepositoryError::storage(format!("corrupt tracker {month}: {e}")))
    }

    /// Moves a class to a new penalization status and adjusts the
    /// enrollment counter by the compensating delta, atomically.
    ///
    /// This is the only writer of `enrollments.penalization_count`.
    /// Returns `None` if the class does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or the stored status is unknown.
    pub async fn apply_penalization_transition(
        &self,
        class_id: Uuid,
        to: PenalizationStatus,
    ) -> Result<Option<PenalizationChange>, RepositoryError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(class) = class_registries::Entity::find_by_id(class_id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let from = penalization_status_from_db(&class.penalization_status)?;
        let delta = penalization_delta(from, to);

        class_registries::Entity::update_many()
            .col_expr(
                class_registries::Column::PenalizationStatus,
                Expr::value(penalization_status_to_db(to)),
            )
            .col_expr(class_registries::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(class_registries::Column::Id.eq(class_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if delta != 0 {
            enrollments::Entity::update_many()
                .col_expr(
                    enrollments::Column::PenalizationCount,
                    Expr::col(enrollments::Column::PenalizationCount).add(delta),
                )
                .col_expr(enrollments::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(enrollments::Column::Id.eq(class.enrollment_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        let penalization_count = enrollments::Entity::find_by_id(class.enrollment_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .map_or(0, |e| e.penalization_count);

        txn.commit().await.map_err(db_err)?;

        debug!(
            class_id = %class_id,
            enrollment_id = %class.enrollment_id,
            delta,
            penalization_count,
            "Penalization status changed"
        );

        Ok(Some(PenalizationChange {
            class_id,
            enrollment_id: class.enrollment_id,
            from,
            to,
            delta,
            penalization_count,
        }))
    }

    async fn load_enrollments<C: ConnectionTrait>(
        db: &C,
        models: Vec<enrollments::Model>,
    ) -> Result<Vec<Enrollment>, RepositoryError> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut students = load_students(db, &ids).await?;

        models
            .into_iter()
            .map(|m| {
                let refs = students.remove(&m.id).unwrap_or_default();
                to_enrollment(m, refs).map_err(RepositoryError::from)
            })
            .collect()
    }
}

impl AttendanceRepository for BillingRepository {
    async fn find_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> Result<Vec<ClassRegistry>, RepositoryError> {
        let models = class_query(enrollment_id, filter)
            .order_by_asc(class_registries::Column::ClassDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models
            .into_iter()
            .map(|m| to_class_registry(m).map_err(RepositoryError::from))
            .collect()
    }

    async fn count_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> Result<u64, RepositoryError> {
        class_query(enrollment_id, filter)
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

impl ReportRepository for BillingRepository {
    async fn find_professor(
        &self,
        professor_id: Uuid,
    ) -> Result<Option<Professor>, RepositoryError> {
        let model = professors::Entity::find_by_id(professor_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_professor))
    }

    async fn list_professors(&self) -> Result<Vec<Professor>, RepositoryError> {
        let models = professors::Entity::find()
            .order_by_asc(professors::Column::Name)
            .order_by_asc(professors::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(to_professor).collect())
    }

    async fn find_active_enrollments(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
        policy: EnrollmentWindowPolicy,
    ) -> Result<Vec<Enrollment>, RepositoryError> {
        let models = enrollment_query(professor_id, month, policy)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Self::load_enrollments(&self.db, models).await
    }

    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, RepositoryError> {
        let model = plans::Entity::find_by_id(plan_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_plan))
    }

    async fn find_professor_type(
        &self,
        type_id: Uuid,
    ) -> Result<Option<ProfessorType>, RepositoryError> {
        let model = professor_types::Entity::find_by_id(type_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_professor_type))
    }

    async fn find_active_bonuses(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
    ) -> Result<Vec<ProfessorBonus>, RepositoryError> {
        let models = professor_bonuses::Entity::find()
            .filter(professor_bonuses::Column::ProfessorId.eq(professor_id))
            .filter(professor_bonuses::Column::Month.eq(month.to_string()))
            .filter(professor_bonuses::Column::Status.eq(bonus_status_to_db(BonusStatus::Active)))
            .order_by_asc(professor_bonuses::Column::BonusDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models
            .into_iter()
            .map(|m| to_bonus(m).map_err(RepositoryError::from))
            .collect()
    }

    async fn save_monthly_tracker(&self, tracker: &MonthlyTracker) -> Result<(), RepositoryError> {
        let payload = serde_json::to_value(tracker)
            .map_err(|e| RepositoryError::storage(format!("tracker encoding failed: {e}")))?;

        let model = monthly_trackers::ActiveModel {
            id: Set(Uuid::new_v4()),
            month: Set(tracker.month.to_string()),
            payload: Set(payload),
            record_special: Set(tracker.record_special),
            date_report: Set(tracker.date_report.into()),
            created_at: Set(Utc::now().into()),
        };

        match model.insert(&self.db).await {
            Ok(_) => {
                info!(month = %tracker.month, "Monthly tracker stored");
                Ok(())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(RepositoryError::conflict(format!(
                    "monthly tracker {} already exists",
                    tracker.month
                )))
            }
            Err(e) => Err(db_err(e)),
        }
    }
}

impl BalanceRepository for BillingRepository {
    async fn find_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        let Some(model) = enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(Self::load_enrollments(&self.db, vec![model]).await?.pop())
    }

    async fn update_enrollment_balance(
        &self,
        enrollment_id: Uuid,
        new_balance: Decimal,
    ) -> Result<Option<Enrollment>, RepositoryError> {
        let result = enrollments::Entity::update_many()
            .col_expr(enrollments::Column::Balance, Expr::value(new_balance))
            .col_expr(enrollments::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(enrollments::Column::Id.eq(enrollment_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_enrollment(enrollment_id).await
    }
}

fn db_err(err: DbErr) -> RepositoryError {
    RepositoryError::storage(err.to_string())
}

/// Builds the class registry query for a filter.
fn class_query(
    enrollment_id: Uuid,
    filter: &ClassRegistryFilter,
) -> Select<class_registries::Entity> {
    let mut query = class_registries::Entity::find()
        .filter(class_registries::Column::EnrollmentId.eq(enrollment_id));

    if let Some((start, end)) = filter.date_range {
        query = query.filter(class_registries::Column::ClassDate.between(start, end));
    }

    let normal = RescheduleState::Normal.code();
    query = match filter.kind {
        ClassKind::Normal => query.filter(class_registries::Column::Reschedule.eq(normal)),
        ClassKind::Reschedule => query.filter(class_registries::Column::Reschedule.ne(normal)),
        ClassKind::Any => query,
    };

    if filter.attended_only {
        query = query.filter(class_registries::Column::ClassViewed.ne(0_i16));
    }

    if let Some(ids) = &filter.original_class_ids {
        query = query.filter(class_registries::Column::OriginalClassId.is_in(ids.clone()));
    }

    query
}

/// Builds the active enrollment query of a professor for a month.
fn enrollment_query(
    professor_id: Uuid,
    month: &YearMonth,
    policy: EnrollmentWindowPolicy,
) -> Select<enrollments::Entity> {
    let (first, last) = (month.first_day(), month.last_day());
    let window = match policy {
        EnrollmentWindowPolicy::BoundaryInMonth => Condition::any()
            .add(enrollments::Column::StartDate.between(first, last))
            .add(enrollments::Column::EndDate.between(first, last)),
        EnrollmentWindowPolicy::OverlapsMonth => Condition::all()
            .add(enrollments::Column::StartDate.lte(last))
            .add(enrollments::Column::EndDate.gte(first)),
    };

    enrollments::Entity::find()
        .filter(enrollments::Column::ProfessorId.eq(professor_id))
        .filter(enrollments::Column::Status.eq(enrollment_status_to_db(EnrollmentStatus::Active)))
        .filter(window)
        .order_by_asc(enrollments::Column::StartDate)
        .order_by_asc(enrollments::Column::Id)
}

/// Loads the ordered students of each enrollment.
async fn load_students<C: ConnectionTrait>(
    db: &C,
    enrollment_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<StudentRef>>, RepositoryError> {
    if enrollment_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = enrollment_students::Entity::find()
        .filter(enrollment_students::Column::EnrollmentId.is_in(enrollment_ids.to_vec()))
        .order_by_asc(enrollment_students::Column::Position)
        .find_also_related(students::Entity)
        .all(db)
        .await
        .map_err(db_err)?;

    let mut by_enrollment: HashMap<Uuid, Vec<StudentRef>> = HashMap::new();
    for (link, student) in rows {
        if let Some(student) = student {
            by_enrollment
                .entry(link.enrollment_id)
                .or_default()
                .push(StudentRef {
                    id: student.id,
                    name: student.name,
                });
        }
    }
    Ok(by_enrollment)
}
