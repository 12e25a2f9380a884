//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20260901_000001_billing_schema;
mod m20260901_000002_monthly_trackers;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_billing_schema::Migration),
            Box::new(m20260901_000002_monthly_trackers::Migration),
        ]
    }
}
