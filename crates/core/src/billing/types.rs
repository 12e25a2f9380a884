//! Billing data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enrollment::EnrollmentType;

/// Unrounded monetary figures for one enrollment.
///
/// Report totals are accumulated from these values; rounding happens only
/// when a line is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineFigures {
    /// Amount taken from the prepaid balance for this period.
    pub amount: Decimal,
    /// Balance carried over after taking `amount`.
    pub old_balance: Decimal,
    /// Plan price divided by the contract's normal classes.
    pub price_per_hour: Decimal,
    /// Professor pay per hour.
    pub pay_rate: Decimal,
    /// Contracted hours (one per normal class).
    pub total_hours: Decimal,
    /// Billable hours attended this month.
    pub hours_seen: Decimal,
    /// Value billed for the hours attended.
    pub total: Decimal,
    /// Amount owed to the professor.
    pub payment: Decimal,
    /// `amount + old_balance - total`.
    pub balance_remaining: Decimal,
}

impl LineFigures {
    /// Returns a copy with every figure rounded to 2 decimal places.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            amount: self.amount.round_dp(2),
            old_balance: self.old_balance.round_dp(2),
            price_per_hour: self.price_per_hour.round_dp(2),
            pay_rate: self.pay_rate.round_dp(2),
            total_hours: self.total_hours.round_dp(2),
            hours_seen: self.hours_seen.round_dp(2),
            total: self.total.round_dp(2),
            payment: self.payment.round_dp(2),
            balance_remaining: self.balance_remaining.round_dp(2),
        }
    }
}

/// One presented line of a professor report.
///
/// Serialized keys match the balance directive contract, so a stored report
/// can be handed back to the reconciler as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    /// Enrollment ID.
    pub enrollment_id: Uuid,
    /// Contract period label.
    pub period: String,
    /// Plan label.
    pub plan: String,
    /// Student label.
    pub student: String,
    /// Enrollment type.
    pub enrollment_type: EnrollmentType,
    /// Amount taken from the prepaid balance.
    pub amount: Decimal,
    /// Contracted hours.
    pub total_hours: Decimal,
    /// Hours attended this month.
    pub hours_seen: Decimal,
    /// Price per hour.
    pub price_per_hour: Decimal,
    /// Professor pay per hour.
    pub pay_rate: Decimal,
    /// Carried balance.
    pub old_balance: Decimal,
    /// Professor payment.
    pub payment: Decimal,
    /// Billed total.
    pub total: Decimal,
    /// Remaining balance after billing.
    #[serde(rename = "balancereamaining")]
    pub balance_remaining: Decimal,
}
