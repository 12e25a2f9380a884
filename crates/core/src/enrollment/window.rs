//! Rules deciding which enrollments belong to a report month.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tutorbill_shared::YearMonth;

/// Month inclusion rule for enrollments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentWindowPolicy {
    /// Include only enrollments whose start or end date falls inside the month.
    ///
    /// An enrollment spanning the whole month with no boundary inside it is
    /// excluded.
    #[default]
    BoundaryInMonth,
    /// Include every enrollment whose contract overlaps the month.
    OverlapsMonth,
}

impl EnrollmentWindowPolicy {
    /// Returns true if a contract running `start..=end` belongs to `month`.
    #[must_use]
    pub fn includes(&self, start: NaiveDate, end: NaiveDate, month: &YearMonth) -> bool {
        match self {
            Self::BoundaryInMonth => month.contains(start) || month.contains(end),
            Self::OverlapsMonth => start <= month.last_day() && end >= month.first_day(),
        }
    }

    /// Returns the configuration name of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BoundaryInMonth => "boundary_in_month",
            Self::OverlapsMonth => "overlaps_month",
        }
    }
}

impl fmt::Display for EnrollmentWindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentWindowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boundary_in_month" => Ok(Self::BoundaryInMonth),
            "overlaps_month" => Ok(Self::OverlapsMonth),
            other => Err(format!("Unknown enrollment window policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[rstest]
    #[case::starts_mid_month(d(2024, 3, 10), d(2024, 8, 1), true, true)]
    #[case::ends_mid_month(d(2023, 11, 1), d(2024, 3, 20), true, true)]
    #[case::inside_month(d(2024, 3, 5), d(2024, 3, 25), true, true)]
    #[case::spans_whole_month(d(2024, 1, 1), d(2024, 6, 30), false, true)]
    #[case::ended_before(d(2023, 9, 1), d(2024, 2, 29), false, false)]
    #[case::starts_after(d(2024, 4, 1), d(2024, 9, 1), false, false)]
    #[case::starts_on_first_day(d(2024, 3, 1), d(2024, 9, 1), true, true)]
    #[case::ends_on_last_day(d(2024, 1, 1), d(2024, 3, 31), true, true)]
    fn test_window_policies(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] boundary: bool,
        #[case] overlaps: bool,
    ) {
        let month = march();
        assert_eq!(
            EnrollmentWindowPolicy::BoundaryInMonth.includes(start, end, &month),
            boundary
        );
        assert_eq!(
            EnrollmentWindowPolicy::OverlapsMonth.includes(start, end, &month),
            overlaps
        );
    }

    #[test]
    fn test_default_is_boundary_rule() {
        assert_eq!(
            EnrollmentWindowPolicy::default(),
            EnrollmentWindowPolicy::BoundaryInMonth
        );
    }

    #[test]
    fn test_parse_round_trip_names() {
        for policy in [
            EnrollmentWindowPolicy::BoundaryInMonth,
            EnrollmentWindowPolicy::OverlapsMonth,
        ] {
            assert_eq!(policy.as_str().parse::<EnrollmentWindowPolicy>(), Ok(policy));
        }
        assert!("whole_year".parse::<EnrollmentWindowPolicy>().is_err());
    }
}
