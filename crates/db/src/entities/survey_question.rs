//! Survey question entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Answer format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Free text.
    #[sea_orm(string_value = "text")]
    Text,
    /// One of `options`.
    #[sea_orm(string_value = "mcq")]
    Mcq,
    /// 1 to 5.
    #[sea_orm(string_value = "rating")]
    Rating,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "survey_question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub survey_id: String,

    /// Display order within the survey
    pub position: i32,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    pub question_type: QuestionType,

    /// Choices for `mcq` questions
    #[sea_orm(column_type = "JsonBinary")]
    pub options: Json,
}

impl Model {
    /// Choices as strings; empty for non-`mcq` questions.
    #[must_use]
    pub fn option_list(&self) -> Vec<String> {
        self.options
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey::Entity",
        from = "Column::SurveyId",
        to = "super::survey::Column::Id",
        on_delete = "Cascade"
    )]
    Survey,
}

impl Related<super::survey::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
