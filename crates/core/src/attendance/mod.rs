//! Attendance aggregation.
//!
//! Turns per-class attendance minutes into billable fractional hours:
//! - Reschedule minutes fold into the normal class they replace
//! - Each normal class is bucketed to quarter hours independently
//! - Buckets are summed across the month

pub mod aggregator;
pub mod bucket;
pub mod types;


pub use aggregator::{AttendanceAggregator, AttendanceRepository};
pub use bucket::fractional_hours;
pub use types::{
    AttendanceSummary, ClassAttendance, ClassKind, ClassRegistry, ClassRegistryFilter, ClassViewed,
    RescheduleState,
};
