//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tutorbill_shared::YearMonth;
use uuid::Uuid;

use crate::billing::ReportLine;
use crate::enrollment::ProfessorBonus;

/// Report subtotals, accumulated from unrounded line figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubtotal {
    /// Sum of billed totals.
    pub total: Decimal,
    /// Sum of remaining balances.
    pub balance_remaining: Decimal,
    /// Sum of professor payments.
    pub payment: Decimal,
}

/// One professor bonus listed in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusDetail {
    /// Bonus ID.
    pub id: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Date granted.
    pub bonus_date: NaiveDate,
    /// Month the bonus applies to.
    pub month: YearMonth,
}

impl From<&ProfessorBonus> for BonusDetail {
    fn from(bonus: &ProfessorBonus) -> Self {
        Self {
            id: bonus.id,
            amount: bonus.amount,
            description: bonus.description.clone(),
            bonus_date: bonus.bonus_date,
            month: bonus.month,
        }
    }
}

/// Manual credits ("abonos") attached to a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abonos {
    /// Sum of active bonus amounts.
    pub total: Decimal,
    /// Individual bonuses.
    pub details: Vec<BonusDetail>,
}

/// Payment report for one professor and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorReport {
    /// Professor ID.
    pub professor_id: Uuid,
    /// Professor name.
    pub professor_name: String,
    /// Report month.
    pub month: YearMonth,
    /// Human-readable month range.
    pub date_range_label: String,
    /// Report lines sorted by plan, then student.
    ///
    /// Serialized as `details` so the report doubles as a balance fragment.
    #[serde(rename = "details")]
    pub lines: Vec<ReportLine>,
    /// Line subtotals.
    pub subtotal: ReportSubtotal,
    /// Manual credits.
    pub abonos: Abonos,
    /// Professor payment plus abonos.
    pub grand_total_payment: Decimal,
}

impl ProfessorReport {
    /// Returns true if the report has neither lines nor bonuses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.abonos.details.is_empty()
    }
}

/// Totals across the general report of a monthly tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummary {
    /// Professors with a report.
    pub professors: usize,
    /// Report lines across professors.
    pub lines: usize,
    /// Sum of billed totals.
    pub total: Decimal,
    /// Sum of remaining balances.
    pub balance_remaining: Decimal,
    /// Sum of professor payments.
    pub payment: Decimal,
    /// Sum of abonos.
    pub abonos: Decimal,
}

impl TrackerSummary {
    /// Summarizes a set of professor reports.
    #[must_use]
    pub fn from_reports(reports: &[ProfessorReport]) -> Self {
        reports.iter().fold(Self::default(), |mut acc, r| {
            acc.professors += 1;
            acc.lines += r.lines.len();
            acc.total += r.subtotal.total;
            acc.balance_remaining += r.subtotal.balance_remaining;
            acc.payment += r.subtotal.payment;
            acc.abonos += r.abonos.total;
            acc
        })
    }
}

/// Write-once snapshot of a month's reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTracker {
    /// Month covered.
    pub month: YearMonth,
    /// General report, one entry per professor.
    pub report: Vec<ProfessorReport>,
    /// Special professor report, if one was generated.
    #[serde(rename = "specialProfessorReport")]
    pub special_professor_report: Option<ProfessorReport>,
    /// Manually curated balance overrides, stored verbatim.
    pub excedents: Option<serde_json::Value>,
    /// Totals across the general report.
    pub summary: TrackerSummary,
    /// Whether the special report is part of the snapshot.
    pub record_special: bool,
    /// When the snapshot was generated.
    pub date_report: DateTime<Utc>,
}
