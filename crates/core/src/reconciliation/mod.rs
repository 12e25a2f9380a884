//! Balance reconciliation.
//!
//! Applies the balance directives of up to three report fragments to live
//! enrollment balances, lowest priority first, so that more specific
//! fragments overwrite more general ones. Each directive is applied on its
//! own; failures are collected and never stop the batch.

pub mod directives;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use directives::collect_directives;
pub use error::ReconcileError;
pub use service::{BalanceReconciler, BalanceRepository};
pub use types::{
    BalanceDirective, BalanceSource, BalanceUpdate, DirectiveFailure, ReconciliationInput,
    ReconciliationResult,
};
