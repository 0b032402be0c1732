//! Diary repository.

use std::sync::Arc;

use crate::entities::{DiaryEntry, diary_entry};
use chrono::NaiveDate;
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Diary repository for database operations.
#[derive(Clone)]
pub struct DiaryRepository {
    db: Arc<DatabaseConnection>,
}

impl DiaryRepository {
    /// Create a new diary repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<diary_entry::Model>> {
        DiaryEntry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's entry for one day.
    pub async fn find_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<diary_entry::Model>> {
        DiaryEntry::find()
            .filter(diary_entry::Column::UserId.eq(user_id))
            .filter(diary_entry::Column::Date.eq(date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All of a user's entries, most recent day first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<diary_entry::Model>> {
        DiaryEntry::find()
            .filter(diary_entry::Column::UserId.eq(user_id))
            .order_by_desc(diary_entry::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's favourite entries, most recent day first.
    pub async fn find_favourites(&self, user_id: &str) -> AppResult<Vec<diary_entry::Model>> {
        DiaryEntry::find()
            .filter(diary_entry::Column::UserId.eq(user_id))
            .filter(diary_entry::Column::IsFavourite.eq(true))
            .order_by_desc(diary_entry::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an entry.
    pub async fn create(&self, model: diary_entry::ActiveModel) -> AppResult<diary_entry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an entry.
    pub async fn update(&self, model: diary_entry::ActiveModel) -> AppResult<diary_entry::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an entry.
    pub async fn delete(&self, model: diary_entry::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
