//! Survey entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "survey")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(default_value = false)]
    pub is_published: bool,

    #[sea_orm(default_value = false)]
    pub is_visible: bool,

    /// Admin who created it
    pub created_by: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether regular users can see and answer this survey.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_published && self.is_visible
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::survey_question::Entity")]
    SurveyQuestion,
    #[sea_orm(has_many = "super::survey_response::Entity")]
    SurveyResponse,
}

impl Related<super::survey_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyQuestion.def()
    }
}

impl Related<super::survey_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
