//! Shared types, errors, and configuration for Tutorbill.
//!
//! This crate provides common types used across all other crates:
//! - Calendar month type used to window attendance and reports
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, BillingConfig, DatabaseConfig};
pub use error::{AppError, AppResult};
pub use types::{MonthError, YearMonth};
