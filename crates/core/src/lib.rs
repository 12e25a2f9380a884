//! Core business logic for Tutorbill.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the repository traits declared next to
//! the services that use them; the db crate implements them.
//!
//! # Modules
//!
//! - `enrollment` - Enrollment, plan, and professor records plus window rules
//! - `attendance` - Folding class attendance into billable fractional hours
//! - `billing` - Per-enrollment financial line computation
//! - `reports` - Professor payment reports and monthly snapshots
//! - `reconciliation` - Priority-ordered balance reconciliation

pub mod attendance;
pub mod billing;
pub mod enrollment;
pub mod reconciliation;
pub mod reports;
pub mod repository;

pub use repository::RepositoryError;

#[cfg(test)]
mod testing;
