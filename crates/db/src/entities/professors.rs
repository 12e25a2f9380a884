//! `SeaORM` Entity for professors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "professors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub professor_type_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professor_types::Entity",
        from = "Column::ProfessorTypeId",
        to = "super::professor_types::Column::Id"
    )]
    ProfessorTypes,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::professor_bonuses::Entity")]
    ProfessorBonuses,
}

impl Related<super::professor_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfessorTypes.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::professor_bonuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfessorBonuses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
