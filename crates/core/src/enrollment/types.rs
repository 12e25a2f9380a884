//! Enrollment data types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tutorbill_shared::YearMonth;
use uuid::Uuid;

/// How many students share an enrollment. Drives plan price and professor rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentType {
    /// One student.
    Single,
    /// Two students.
    Couple,
    /// Three or more students.
    Group,
}

impl EnrollmentType {
    /// Returns the lowercase name used in storage and labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Couple => "couple",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for EnrollmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "couple" => Ok(Self::Couple),
            "group" => Ok(Self::Group),
            _ => Err(format!("Unknown enrollment type: {s}")),
        }
    }
}

/// Enrollment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Billable.
    Active,
    /// Ignored by reports.
    Inactive,
}

/// Student reference carried on an enrollment, in enrollment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    /// Student ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Contract between one professor and one or more students for a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrollment ID.
    pub id: Uuid,
    /// Professor teaching the enrollment.
    pub professor_id: Uuid,
    /// Students, in enrollment order.
    pub students: Vec<StudentRef>,
    /// Billing plan.
    pub plan_id: Uuid,
    /// Enrollment type.
    pub enrollment_type: EnrollmentType,
    /// Optional display name used instead of the student names.
    pub alias: Option<String>,
    /// Contract start date.
    pub start_date: NaiveDate,
    /// Contract end date.
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: EnrollmentStatus,
    /// Prepaid credit.
    pub available_balance: Decimal,
    /// Amount due for the period.
    pub total_amount: Decimal,
    /// Carried remaining credit. Only the reconciler reassigns it.
    pub balance: Decimal,
    /// Number of penalized classes.
    pub penalization_count: i32,
}

impl Enrollment {
    /// Label used for the student column of a report line.
    ///
    /// The alias wins when present and non-blank; otherwise student names are
    /// joined in enrollment order.
    #[must_use]
    pub fn student_label(&self) -> String {
        match self.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => self
                .students
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }

    /// Label for the contract period, e.g. `2024-03-01 - 2024-06-30`.
    #[must_use]
    pub fn period_label(&self) -> String {
        format!("{} - {}", self.start_date, self.end_date)
    }

    /// Returns true if the enrollment is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}

/// Billing template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan ID.
    pub id: Uuid,
    /// Plan name.
    pub name: String,
    /// Nominal number of classes per month.
    pub monthly_classes: i32,
    /// Price per period by enrollment type. Absent means not offered.
    pub pricing: HashMap<EnrollmentType, Decimal>,
}

impl Plan {
    /// Price for `enrollment_type`, if the plan offers it.
    #[must_use]
    pub fn price_for(&self, enrollment_type: EnrollmentType) -> Option<Decimal> {
        self.pricing.get(&enrollment_type).copied()
    }
}

/// Professor pay-rate template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorType {
    /// Professor type ID.
    pub id: Uuid,
    /// Type name.
    pub name: String,
    /// Pay per hour by enrollment type.
    pub rates: HashMap<EnrollmentType, Decimal>,
}

impl ProfessorType {
    /// Pay per hour for `enrollment_type`, if configured.
    #[must_use]
    pub fn rate_for(&self, enrollment_type: EnrollmentType) -> Option<Decimal> {
        self.rates.get(&enrollment_type).copied()
    }
}

/// Professor record as needed by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    /// Professor ID.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Pay-rate template.
    pub professor_type_id: Option<Uuid>,
}

/// Status of a manually entered professor bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusStatus {
    /// Counts toward the month's abonos.
    Active,
    /// Ignored.
    Voided,
}

/// Manual credit for a professor in a specific month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorBonus {
    /// Bonus ID.
    pub id: Uuid,
    /// Professor receiving the bonus.
    pub professor_id: Uuid,
    /// Amount (non-negative).
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Date the bonus was granted.
    pub bonus_date: NaiveDate,
    /// Month the bonus applies to.
    pub month: YearMonth,
    /// Status.
    pub status: BonusStatus,
}
