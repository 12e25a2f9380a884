//! Per-enrollment financial computation.
//!
//! Given an enrollment, its plan, its professor's rate table, and the
//! aggregated attendance, produces one report line: amount charged, carried
//! balance, professor payment, billed total, and remaining balance.

pub mod calculator;
pub mod types;


pub use calculator::BillingCalculator;
pub use types::{LineFigures, ReportLine};
