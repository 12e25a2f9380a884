//! Billing schema migration.
//!
//! Creates professors, plans, enrollments, and the class registry.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
CREATE TABLE professor_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    rate_single NUMERIC(12, 2),
    rate_couple NUMERIC(12, 2),
    rate_group NUMERIC(12, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE professors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    professor_type_id UUID REFERENCES professor_types(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE plans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    monthly_classes INTEGER NOT NULL DEFAULT 0 CHECK (monthly_classes >= 0),
    price_single NUMERIC(12, 2),
    price_couple NUMERIC(12, 2),
    price_group NUMERIC(12, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE enrollments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    professor_id UUID NOT NULL REFERENCES professors(id),
    plan_id UUID NOT NULL,
    enrollment_type VARCHAR(10) NOT NULL CHECK (enrollment_type IN ('single', 'couple', 'group')),
    alias VARCHAR(200),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status VARCHAR(10) NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
    available_balance NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (available_balance >= 0),
    total_amount NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (total_amount >= 0),
    balance NUMERIC(14, 4) NOT NULL DEFAULT 0,
    penalization_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_enrollment_dates CHECK (end_date >= start_date)
);

-- plan_id carries no foreign key: reports skip enrollments whose plan was removed

CREATE INDEX idx_enrollments_professor ON enrollments(professor_id, status);
CREATE INDEX idx_enrollments_window ON enrollments(start_date, end_date);

CREATE TABLE enrollment_students (
    enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
    student_id UUID NOT NULL REFERENCES students(id),
    position INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (enrollment_id, student_id)
);

CREATE TABLE class_registries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
    class_date DATE NOT NULL,
    class_viewed SMALLINT NOT NULL DEFAULT 0 CHECK (class_viewed IN (0, 1, 2)),
    minutes_viewed INTEGER NOT NULL DEFAULT 0 CHECK (minutes_viewed >= 0),
    reschedule SMALLINT NOT NULL DEFAULT 0 CHECK (reschedule IN (0, 1, 2)),
    original_class_id UUID REFERENCES class_registries(id) ON DELETE SET NULL,
    penalization_status VARCHAR(10) NOT NULL DEFAULT 'pending'
        CHECK (penalization_status IN ('pending', 'penalized', 'excused')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Attendance window reads
CREATE INDEX idx_class_registries_enrollment_date ON class_registries(enrollment_id, class_date);

-- Reschedule lookup by original class
CREATE INDEX idx_class_registries_original ON class_registries(original_class_id)
    WHERE original_class_id IS NOT NULL;

CREATE TABLE professor_bonuses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    professor_id UUID NOT NULL REFERENCES professors(id) ON DELETE CASCADE,
    amount NUMERIC(12, 2) NOT NULL CHECK (amount >= 0),
    description TEXT NOT NULL DEFAULT '',
    bonus_date DATE NOT NULL,
    month VARCHAR(7) NOT NULL CHECK (month ~ '^[0-9]{4}-[0-9]{2}$'),
    status VARCHAR(10) NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'voided')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_professor_bonuses_month ON professor_bonuses(professor_id, month)
    WHERE status = 'active';
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS professor_bonuses CASCADE;
DROP TABLE IF EXISTS class_registries CASCADE;
DROP TABLE IF EXISTS enrollment_students CASCADE;
DROP TABLE IF EXISTS enrollments CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS plans CASCADE;
DROP TABLE IF EXISTS professors CASCADE;
DROP TABLE IF EXISTS professor_types CASCADE;
";
