//! `SeaORM` Entity for enrollments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub professor_id: Uuid,
    pub plan_id: Uuid,
    pub enrollment_type: String,
    pub alias: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub available_balance: Decimal,
    pub total_amount: Decimal,
    pub balance: Decimal,
    pub penalization_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professors::Entity",
        from = "Column::ProfessorId",
        to = "super::professors::Column::Id"
    )]
    Professors,
    #[sea_orm(
        belongs_to = "super::plans::Entity",
        from = "Column::PlanId",
        to = "super::plans::Column::Id"
    )]
    Plans,
    #[sea_orm(has_many = "super::enrollment_students::Entity")]
    EnrollmentStudents,
    #[sea_orm(has_many = "super::class_registries::Entity")]
    ClassRegistries,
}

impl Related<super::professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professors.def()
    }
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plans.def()
    }
}

impl Related<super::enrollment_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentStudents.def()
    }
}

impl Related<super::class_registries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassRegistries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
