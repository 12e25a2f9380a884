//! Professor payment reports.
//!
//! This module orchestrates attendance aggregation and billing over a
//! professor's active enrollments for a month:
//! - Single professor report
//! - Special professor report
//! - General report (every other professor)
//! - Monthly tracker snapshot

pub mod error;
pub mod service;
pub mod sorting;
pub mod types;


pub use error::ReportError;
pub use service::{ReportRepository, ReportService, ReportSettings};
pub use types::*;
