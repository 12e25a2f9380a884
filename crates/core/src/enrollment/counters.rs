//! Single-writer contract for the enrollment penalization counter.
//!
//! Status transitions on a class are the only thing allowed to move the
//! counter, and every increment has an inverse so a reverted transition
//! restores the previous count.

use serde::{Deserialize, Serialize};

/// Penalization status of a class record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenalizationStatus {
    /// No decision yet.
    Pending,
    /// Counts against the enrollment.
    Penalized,
    /// Explicitly excused.
    Excused,
}

/// Counter delta caused by moving a class from `from` to `to`.
///
/// Entering `Penalized` adds one, leaving it subtracts one, and every other
/// transition leaves the counter untouched.
#[must_use]
pub const fn penalization_delta(from: PenalizationStatus, to: PenalizationStatus) -> i32 {
    match (from, to) {
        (PenalizationStatus::Penalized, PenalizationStatus::Penalized) => 0,
        (_, PenalizationStatus::Penalized) => 1,
        (PenalizationStatus::Penalized, _) => -1,
        _ => 0,
    }
}
