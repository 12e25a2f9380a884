//! Enrollment, plan, and professor records consumed by billing.
//!
//! These records are owned by the enrollment-management collaborators; this
//! crate only reads them, except for the enrollment balance (written by the
//! reconciler) and the penalization counter transition contract.

pub mod counters;
pub mod types;
pub mod window;

pub use counters::{PenalizationStatus, penalization_delta};
pub use types::{
    BonusStatus, Enrollment, EnrollmentStatus, EnrollmentType, Plan, Professor, ProfessorBonus,
    ProfessorType, StudentRef,
};
pub use window::EnrollmentWindowPolicy;
