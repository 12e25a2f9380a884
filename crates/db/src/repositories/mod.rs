//! Repository implementations for data access.
//!
//! Repositories implement the core repository traits, hiding the `SeaORM`
//! implementation details from the business logic.

pub mod billing;
pub mod convert;

pub use billing::{BillingRepository, PenalizationChange};
pub use convert::RowError;
