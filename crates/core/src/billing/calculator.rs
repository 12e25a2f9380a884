//! Enrollment financial calculator.

use rust_decimal::Decimal;

use super::types::{LineFigures, ReportLine};
use crate::enrollment::{Enrollment, EnrollmentType, Plan, ProfessorType};

/// Computes report lines from enrollment, plan, rate, and attendance data.
///
/// Every function here is pure: identical inputs always produce identical
/// output and nothing is read from or written to storage.
pub struct BillingCalculator;

impl BillingCalculator {
    /// Splits the prepaid balance into the amount charged and the carried balance.
    ///
    /// - `available >= total_amount`: charge `total_amount`, carry the rest
    /// - otherwise: charge nothing, carry everything
    #[must_use]
    pub fn split_balance(available_balance: Decimal, total_amount: Decimal) -> (Decimal, Decimal) {
        if available_balance >= total_amount {
            (total_amount, available_balance - total_amount)
        } else {
            (Decimal::ZERO, available_balance)
        }
    }

    /// Plan price spread over the contract's normal classes.
    ///
    /// Returns zero when the plan is missing, the plan has no price for the
    /// enrollment type, or there are no normal classes.
    #[must_use]
    pub fn price_per_hour(
        plan: Option<&Plan>,
        enrollment_type: EnrollmentType,
        total_normal_classes: u64,
    ) -> Decimal {
        match plan.and_then(|p| p.price_for(enrollment_type)) {
            Some(price) if total_normal_classes > 0 => price / Decimal::from(total_normal_classes),
            _ => Decimal::ZERO,
        }
    }

    /// Professor pay per hour, or zero when no rate is configured.
    #[must_use]
    pub fn pay_rate(
        professor_type: Option<&ProfessorType>,
        enrollment_type: EnrollmentType,
    ) -> Decimal {
        professor_type
            .and_then(|t| t.rate_for(enrollment_type))
            .unwrap_or(Decimal::ZERO)
    }

    /// Computes the unrounded figures for one enrollment.
    #[must_use]
    pub fn compute_figures(
        enrollment: &Enrollment,
        plan: Option<&Plan>,
        professor_type: Option<&ProfessorType>,
        hours_seen: Decimal,
        total_normal_classes: u64,
    ) -> LineFigures {
        let price_per_hour =
            Self::price_per_hour(plan, enrollment.enrollment_type, total_normal_classes);
        let pay_rate = Self::pay_rate(professor_type, enrollment.enrollment_type);
        let (amount, old_balance) =
            Self::split_balance(enrollment.available_balance, enrollment.total_amount);

        let total = hours_seen * price_per_hour;
        let payment = pay_rate * hours_seen;

        LineFigures {
            amount,
            old_balance,
            price_per_hour,
            pay_rate,
            total_hours: Decimal::from(total_normal_classes),
            hours_seen,
            total,
            payment,
            balance_remaining: (amount + old_balance) - total,
        }
    }

    /// Builds the presented line from unrounded figures.
    #[must_use]
    pub fn present(
        enrollment: &Enrollment,
        plan: Option<&Plan>,
        figures: &LineFigures,
    ) -> ReportLine {
        let rounded = figures.rounded();
        ReportLine {
            enrollment_id: enrollment.id,
            period: enrollment.period_label(),
            plan: plan.map(|p| p.name.clone()).unwrap_or_default(),
            student: enrollment.student_label(),
            enrollment_type: enrollment.enrollment_type,
            amount: rounded.amount,
            total_hours: rounded.total_hours,
            hours_seen: rounded.hours_seen,
            price_per_hour: rounded.price_per_hour,
            pay_rate: rounded.pay_rate,
            old_balance: rounded.old_balance,
            payment: rounded.payment,
            total: rounded.total,
            balance_remaining: rounded.balance_remaining,
        }
    }

    /// Computes and presents one report line.
    #[must_use]
    pub fn compute_line(
        enrollment: &Enrollment,
        plan: Option<&Plan>,
        professor_type: Option<&ProfessorType>,
        hours_seen: Decimal,
        total_normal_classes: u64,
    ) -> ReportLine {
        let figures = Self::compute_figures(
            enrollment,
            plan,
            professor_type,
            hours_seen,
            total_normal_classes,
        );
        Self::present(enrollment, plan, &figures)
    }
}
