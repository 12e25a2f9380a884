//! Row to domain conversions.
//!
//! Stored enums are plain strings and small integer codes; anything the
//! domain does not recognise is reported as a `RowError` instead of being
//! silently coerced.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tutorbill_core::RepositoryError;
use tutorbill_core::attendance::{ClassRegistry, ClassViewed, RescheduleState};
use tutorbill_core::enrollment::{
    BonusStatus, Enrollment, EnrollmentStatus, EnrollmentType, PenalizationStatus, Plan,
    Professor, ProfessorBonus, ProfessorType, StudentRef,
};

use crate::entities::{
    class_registries, enrollments, plans, professor_bonuses, professor_types, professors,
};

/// A stored value the domain cannot represent.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {column} value '{value}'")]
pub struct RowError {
    /// Column holding the value.
    pub column: &'static str,
    /// Value as stored.
    pub value: String,
}

impl RowError {
    fn new(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }
}

impl From<RowError> for RepositoryError {
    fn from(err: RowError) -> Self {
        Self::storage(err.to_string())
    }
}

/// Convert a database professor to the domain model.
pub fn to_professor(model: professors::Model) -> Professor {
    Professor {
        id: model.id,
        name: model.name,
        professor_type_id: model.professor_type_id,
    }
}

/// Convert a database professor type to the domain model.
///
/// Enrollment types without a stored rate are left out of the rate table.
pub fn to_professor_type(model: professor_types::Model) -> ProfessorType {
    ProfessorType {
        id: model.id,
        name: model.name,
        rates: by_type(model.rate_single, model.rate_couple, model.rate_group),
    }
}

/// Convert a database plan to the domain model.
pub fn to_plan(model: plans::Model) -> Plan {
    Plan {
        id: model.id,
        name: model.name,
        monthly_classes: model.monthly_classes,
        pricing: by_type(model.price_single, model.price_couple, model.price_group),
    }
}

fn by_type(
    single: Option<Decimal>,
    couple: Option<Decimal>,
    group: Option<Decimal>,
) -> HashMap<EnrollmentType, Decimal> {
    [
        (EnrollmentType::Single, single),
        (EnrollmentType::Couple, couple),
        (EnrollmentType::Group, group),
    ]
    .into_iter()
    .filter_map(|(t, v)| v.map(|v| (t, v)))
    .collect()
}

/// Convert a database enrollment and its ordered students to the domain model.
pub fn to_enrollment(
    model: enrollments::Model,
    students: Vec<StudentRef>,
) -> Result<Enrollment, RowError> {
    let enrollment_type = model
        .enrollment_type
        .parse()
        .map_err(|_| RowError::new("enrollment_type", &model.enrollment_type))?;

    Ok(Enrollment {
        id: model.id,
        professor_id: model.professor_id,
        students,
        plan_id: model.plan_id,
        enrollment_type,
        alias: model.alias,
        start_date: model.start_date,
        end_date: model.end_date,
        status: enrollment_status_from_db(&model.status)?,
        available_balance: model.available_balance,
        total_amount: model.total_amount,
        balance: model.balance,
        penalization_count: model.penalization_count,
    })
}

/// Parse a stored enrollment status.
pub fn enrollment_status_from_db(status: &str) -> Result<EnrollmentStatus, RowError> {
    match status {
        "active" => Ok(EnrollmentStatus::Active),
        "inactive" => Ok(EnrollmentStatus::Inactive),
        other => Err(RowError::new("status", other)),
    }
}

/// Storage name of an enrollment status.
pub const fn enrollment_status_to_db(status: EnrollmentStatus) -> &'static str {
    match status {
        EnrollmentStatus::Active => "active",
        EnrollmentStatus::Inactive => "inactive",
    }
}

/// Convert a database class record to the domain model.
pub fn to_class_registry(model: class_registries::Model) -> Result<ClassRegistry, RowError> {
    let class_viewed = ClassViewed::from_code(model.class_viewed)
        .ok_or_else(|| RowError::new("class_viewed", model.class_viewed))?;
    let reschedule = RescheduleState::from_code(model.reschedule)
        .ok_or_else(|| RowError::new("reschedule", model.reschedule))?;

    Ok(ClassRegistry {
        id: model.id,
        enrollment_id: model.enrollment_id,
        class_date: model.class_date,
        class_viewed,
        minutes_viewed: model.minutes_viewed.max(0),
        reschedule,
        original_class_id: model.original_class_id,
    })
}

/// Convert a database bonus to the domain model.
pub fn to_bonus(model: professor_bonuses::Model) -> Result<ProfessorBonus, RowError> {
    let month = model
        .month
        .parse()
        .map_err(|_| RowError::new("month", &model.month))?;

    Ok(ProfessorBonus {
        id: model.id,
        professor_id: model.professor_id,
        amount: model.amount,
        description: model.description,
        bonus_date: model.bonus_date,
        month,
        status: bonus_status_from_db(&model.status)?,
    })
}

/// Parse a stored bonus status.
pub fn bonus_status_from_db(status: &str) -> Result<BonusStatus, RowError> {
    match status {
        "active" => Ok(BonusStatus::Active),
        "voided" => Ok(BonusStatus::Voided),
        other => Err(RowError::new("status", other)),
    }
}

/// Storage name of a bonus status.
pub const fn bonus_status_to_db(status: BonusStatus) -> &'static str {
    match status {
        BonusStatus::Active => "active",
        BonusStatus::Voided => "voided",
    }
}

/// Parse a stored penalization status.
pub fn penalization_status_from_db(status: &str) -> Result<PenalizationStatus, RowError> {
    match status {
        "pending" => Ok(PenalizationStatus::Pending),
        "penalized" => Ok(PenalizationStatus::Penalized),
        "excused" => Ok(PenalizationStatus::Excused),
        other => Err(RowError::new("penalization_status", other)),
    }
}

/// Storage name of a penalization status.
pub const fn penalization_status_to_db(status: PenalizationStatus) -> &'static str {
    match status {
        PenalizationStatus::Pending => "pending",
        PenalizationStatus::Penalized => "penalized",
        PenalizationStatus::Excused => "excused",
    }
}
