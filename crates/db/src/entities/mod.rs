//! `SeaORM` entity definitions.

pub mod class_registries;
pub mod enrollment_students;
pub mod enrollments;
pub mod monthly_trackers;
pub mod plans;
pub mod professor_bonuses;
pub mod professor_types;
pub mod professors;
pub mod students;
