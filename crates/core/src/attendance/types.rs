//! Attendance data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a class was attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassViewed {
    /// Not attended (stored as 0).
    NotViewed,
    /// Attended (stored as 1).
    Viewed,
    /// Partially attended (stored as 2).
    Partial,
}

impl ClassViewed {
    /// Storage code.
    #[must_use]
    pub const fn code(&self) -> i16 {
        match self {
            Self::NotViewed => 0,
            Self::Viewed => 1,
            Self::Partial => 2,
        }
    }

    /// Parses a storage code.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::NotViewed),
            1 => Some(Self::Viewed),
            2 => Some(Self::Partial),
            _ => None,
        }
    }

    /// Returns true if at least part of the class was attended.
    #[must_use]
    pub const fn was_attended(&self) -> bool {
        matches!(self, Self::Viewed | Self::Partial)
    }
}

/// Reschedule state of a class record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescheduleState {
    /// Normal scheduled class (stored as 0).
    Normal,
    /// Rescheduled, not yet held (stored as 1).
    Pending,
    /// Rescheduled and held (stored as 2).
    Viewed,
}

impl RescheduleState {
    /// Storage code.
    #[must_use]
    pub const fn code(&self) -> i16 {
        match self {
            Self::Normal => 0,
            Self::Pending => 1,
            Self::Viewed => 2,
        }
    }

    /// Parses a storage code.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Pending),
            2 => Some(Self::Viewed),
            _ => None,
        }
    }

    /// Returns true for records that reschedule another class.
    #[must_use]
    pub const fn is_reschedule(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// One scheduled class occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRegistry {
    /// Class record ID.
    pub id: Uuid,
    /// Enrollment the class belongs to.
    pub enrollment_id: Uuid,
    /// Calendar date of the class.
    pub class_date: NaiveDate,
    /// Attendance state.
    pub class_viewed: ClassViewed,
    /// Minutes attended (non-negative).
    pub minutes_viewed: i32,
    /// Reschedule state.
    pub reschedule: RescheduleState,
    /// Normal class this record reschedules. Set only for reschedules.
    pub original_class_id: Option<Uuid>,
}

/// Which class records a query should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassKind {
    /// Normal classes only.
    Normal,
    /// Reschedule records only.
    Reschedule,
    /// Everything.
    #[default]
    Any,
}

/// Filter for class registry queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistryFilter {
    /// Inclusive date range.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Normal or reschedule records.
    pub kind: ClassKind,
    /// Only attended or partially attended classes.
    pub attended_only: bool,
    /// Only records rescheduling one of these classes.
    pub original_class_ids: Option<Vec<Uuid>>,
}

impl ClassRegistryFilter {
    /// Attended normal classes within `start..=end`.
    #[must_use]
    pub fn attended_normal(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date_range: Some((start, end)),
            kind: ClassKind::Normal,
            attended_only: true,
            original_class_ids: None,
        }
    }

    /// Reschedules within `start..=end` of any of `original_ids`.
    #[must_use]
    pub fn reschedules_of(start: NaiveDate, end: NaiveDate, original_ids: Vec<Uuid>) -> Self {
        Self {
            date_range: Some((start, end)),
            kind: ClassKind::Reschedule,
            attended_only: false,
            original_class_ids: Some(original_ids),
        }
    }

    /// Every normal class, all time.
    #[must_use]
    pub fn all_normal() -> Self {
        Self {
            kind: ClassKind::Normal,
            ..Self::default()
        }
    }

    /// Returns true if `class` satisfies the filter.
    #[must_use]
    pub fn matches(&self, class: &ClassRegistry) -> bool {
        if let Some((start, end)) = self.date_range {
            if class.class_date < start || class.class_date > end {
                return false;
            }
        }

        let kind_ok = match self.kind {
            ClassKind::Normal => !class.reschedule.is_reschedule(),
            ClassKind::Reschedule => class.reschedule.is_reschedule(),
            ClassKind::Any => true,
        };
        if !kind_ok {
            return false;
        }

        if self.attended_only && !class.class_viewed.was_attended() {
            return false;
        }

        match &self.original_class_ids {
            Some(ids) => class
                .original_class_id
                .is_some_and(|original| ids.contains(&original)),
            None => true,
        }
    }
}

/// Attendance of one normal class with its reschedules folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAttendance {
    /// Normal class ID.
    pub class_id: Uuid,
    /// Normal class date.
    pub class_date: NaiveDate,
    /// Minutes attended on the normal class itself.
    pub own_minutes: i64,
    /// Minutes attended across its reschedules.
    pub rescheduled_minutes: i64,
    /// Billable hours after bucketing the combined minutes.
    pub hours: Decimal,
}

impl ClassAttendance {
    /// Combined minutes of the class and its reschedules.
    #[must_use]
    pub const fn total_minutes(&self) -> i64 {
        self.own_minutes + self.rescheduled_minutes
    }
}

/// Attendance of one enrollment over a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Sum of bucketed hours over the month.
    pub hours_seen: Decimal,
    /// Normal classes of the enrollment, all time. Billing denominator.
    pub total_normal_classes: u64,
    /// Per-class breakdown.
    pub classes: Vec<ClassAttendance>,
}
