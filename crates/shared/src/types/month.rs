//! Calendar month (`YYYY-MM`) used to window attendance and reports.
//!
//! Reports are always generated for a closed calendar month. The month is
//! carried as a validated value so every downstream query receives the same
//! inclusive `[first_day, last_day]` bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a month string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthError {
    /// Input is not shaped like `YYYY-MM`.
    #[error("invalid month format '{0}', expected YYYY-MM")]
    InvalidFormat(String),

    /// Month number outside 1..=12.
    #[error("invalid month number {0}, expected 01-12")]
    InvalidMonth(u32),

    /// Year outside the supported range.
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),
}

/// A validated calendar month with its inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl YearMonth {
    /// Creates a month from its year and 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns `MonthError` if the month is not in 1..=12 or the year is
    /// outside 1900..=9999.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1900..=9999).contains(&year) {
            return Err(MonthError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(MonthError::InvalidMonth(month));
        }

        let first_day =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(MonthError::InvalidMonth(month))?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or(MonthError::YearOutOfRange(year))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// Returns the month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `MonthError::YearOutOfRange` for dates outside 1900..=9999.
    pub fn containing(date: NaiveDate) -> Result<Self, MonthError> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// 1-based month number.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// First day of the month (inclusive lower bound).
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month (inclusive upper bound).
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns true if `date` falls within the month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Human-readable range label, e.g. `2024-03-01 - 2024-03-31`.
    #[must_use]
    pub fn range_label(&self) -> String {
        format!("{} - {}", self.first_day, self.last_day)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || MonthError::InvalidFormat(s.to_string());

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-01", date(2024, 1, 1), date(2024, 1, 31))]
    #[case("2024-02", date(2024, 2, 1), date(2024, 2, 29))]
    #[case("2023-02", date(2023, 2, 1), date(2023, 2, 28))]
    #[case("2024-04", date(2024, 4, 1), date(2024, 4, 30))]
    #[case("2024-12", date(2024, 12, 1), date(2024, 12, 31))]
    fn test_month_bounds(#[case] input: &str, #[case] first: NaiveDate, #[case] last: NaiveDate) {
        let month: YearMonth = input.parse().unwrap();
        assert_eq!(month.first_day(), first);
        assert_eq!(month.last_day(), last);
        assert_eq!(month.to_string(), input);
    }

    #[rstest]
    #[case("2024-3")]
    #[case("24-03")]
    #[case("2024/03")]
    #[case("march")]
    #[case("")]
    #[case("2024-0a")]
    fn test_rejects_bad_format(#[case] input: &str) {
        assert!(matches!(
            input.parse::<YearMonth>(),
            Err(MonthError::InvalidFormat(_))
        ));
    }

    #[rstest]
    #[case("2024-00", 0)]
    #[case("2024-13", 13)]
    fn test_rejects_bad_month_number(#[case] input: &str, #[case] month: u32) {
        assert_eq!(
            input.parse::<YearMonth>(),
            Err(MonthError::InvalidMonth(month))
        );
    }

    #[test]
    fn test_contains_is_inclusive() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert!(month.contains(date(2024, 3, 1)));
        assert!(month.contains(date(2024, 3, 31)));
        assert!(!month.contains(date(2024, 2, 29)));
        assert!(!month.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_range_label() {
        let month = YearMonth::new(2024, 3).unwrap();
        assert_eq!(month.range_label(), "2024-03-01 - 2024-03-31");
    }

    #[test]
    fn test_serde_as_string() {
        let month = YearMonth::new(2025, 7).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2025-07\"");

        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<YearMonth>("\"2025-7\"").is_err());
    }

    #[test]
    fn test_containing() {
        let month = YearMonth::containing(date(2024, 11, 17)).unwrap();
        assert_eq!(month.to_string(), "2024-11");
    }
}
