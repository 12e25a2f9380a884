//! Quarter-hour bucketing of attended minutes.

use rust_decimal::Decimal;

/// Converts attended minutes to billable hours.
///
/// Attendance is billed in quarter hours and never pro-rated:
///
/// | minutes   | hours |
/// |-----------|-------|
/// | `<= 0`    | 0     |
/// | `1..=15`  | 0.25  |
/// | `16..=30` | 0.5   |
/// | `31..=45` | 0.75  |
/// | `> 45`    | 1     |
#[must_use]
pub fn fractional_hours(minutes: i64) -> Decimal {
    match minutes {
        i64::MIN..=0 => Decimal::ZERO,
        1..=15 => Decimal::new(25, 2),
        16..=30 => Decimal::new(50, 2),
        31..=45 => Decimal::new(75, 2),
        _ => Decimal::ONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(-5, dec!(0))]
    #[case(0, dec!(0))]
    #[case(1, dec!(0.25))]
    #[case(10, dec!(0.25))]
    #[case(15, dec!(0.25))]
    #[case(16, dec!(0.5))]
    #[case(30, dec!(0.5))]
    #[case(31, dec!(0.75))]
    #[case(45, dec!(0.75))]
    #[case(46, dec!(1))]
    #[case(50, dec!(1))]
    #[case(180, dec!(1))]
    fn test_bucket_edges(#[case] minutes: i64, #[case] expected: Decimal) {
        assert_eq!(fractional_hours(minutes), expected);
    }
}
