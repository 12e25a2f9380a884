//! Monthly tracker migration.
//!
//! Stores write-once monthly report snapshots.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(TRACKERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS monthly_trackers CASCADE;
             DROP FUNCTION IF EXISTS reject_monthly_tracker_update();",
        )
        .await?;
        Ok(())
    }
}

const TRACKERS_SQL: &str = r"
CREATE TABLE monthly_trackers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    month VARCHAR(7) NOT NULL CHECK (month ~ '^[0-9]{4}-[0-9]{2}$'),
    payload JSONB NOT NULL,
    record_special BOOLEAN NOT NULL DEFAULT false,
    date_report TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_monthly_trackers_month UNIQUE (month)
);

-- Snapshots are write-once
CREATE OR REPLACE FUNCTION reject_monthly_tracker_update() RETURNS trigger AS $$
BEGIN
    RAISE EXCEPTION 'monthly tracker % is immutable', OLD.month;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_monthly_trackers_immutable
    BEFORE UPDATE ON monthly_trackers
    FOR EACH ROW EXECUTE FUNCTION reject_monthly_tracker_update();
";
