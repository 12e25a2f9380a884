//! Reconciliation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report fragment a directive came from, in increasing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BalanceSource {
    /// General report (lowest priority).
    #[serde(rename = "report")]
    Report,
    /// Special professor report.
    #[serde(rename = "specialProfessorReport")]
    SpecialProfessorReport,
    /// Manual end-of-month overrides (highest priority).
    #[serde(rename = "excedents")]
    Excedents,
}

impl BalanceSource {
    /// Every source, lowest priority first.
    pub const TIERS: [Self; 3] = [Self::Report, Self::SpecialProfessorReport, Self::Excedents];

    /// Fragment key name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::SpecialProfessorReport => "specialProfessorReport",
            Self::Excedents => "excedents",
        }
    }
}

impl std::fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instruction to set an enrollment's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDirective {
    /// Target enrollment.
    #[serde(rename = "enrollmentId")]
    pub enrollment_id: Uuid,
    /// Balance to assign.
    #[serde(rename = "balancereamaining")]
    pub new_balance: Decimal,
}

/// The three fragments handed to the reconciler. Each is opaque JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationInput {
    /// General report.
    #[serde(default)]
    pub report: Option<serde_json::Value>,
    /// Special professor report.
    #[serde(default, rename = "specialProfessorReport")]
    pub special_professor_report: Option<serde_json::Value>,
    /// Manual overrides.
    #[serde(default)]
    pub excedents: Option<serde_json::Value>,
}

impl ReconciliationInput {
    /// Fragment for `source`, if supplied.
    #[must_use]
    pub fn fragment(&self, source: BalanceSource) -> Option<&serde_json::Value> {
        match source {
            BalanceSource::Report => self.report.as_ref(),
            BalanceSource::SpecialProfessorReport => self.special_professor_report.as_ref(),
            BalanceSource::Excedents => self.excedents.as_ref(),
        }
    }
}

/// A balance write that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    /// Enrollment updated.
    pub enrollment_id: Uuid,
    /// Balance before the write.
    pub old_balance: Decimal,
    /// Balance written.
    pub new_balance: Decimal,
    /// Fragment the directive came from.
    pub source: BalanceSource,
}

/// A balance directive that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveFailure {
    /// Enrollment ID as given in the fragment (may be malformed).
    pub enrollment_id: String,
    /// Fragment the directive came from.
    pub source: BalanceSource,
    /// What went wrong.
    pub message: String,
}

/// Tally of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Successful writes, in application order.
    pub updated: Vec<BalanceUpdate>,
    /// Failed directives, in application order.
    pub errors: Vec<DirectiveFailure>,
}

impl ReconciliationResult {
    /// Returns true if every directive was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
