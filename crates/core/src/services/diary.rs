//! Personal plant diary service.

use chrono::NaiveDate;
use florai_common::{AppError, AppResult, IdGenerator, dates};
use florai_db::{
    entities::diary_entry::{self, PlantCondition},
    repositories::DiaryRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Body of a diary entry for one day.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveDiaryEntryInput {
    #[validate(length(max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000))]
    pub text: String,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(length(max = 128))]
    pub plant_name: Option<String>,

    pub plant_condition: Option<PlantCondition>,

    #[validate(length(max = 4000))]
    pub plant_notes: Option<String>,
}

/// Diary service.
#[derive(Clone)]
pub struct DiaryService {
    diary_repo: DiaryRepository,
    id_gen: IdGenerator,
}

impl DiaryService {
    /// Create a new diary service.
    #[must_use]
    pub const fn new(diary_repo: DiaryRepository) -> Self {
        Self {
            diary_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// A user's entries, most recent day first.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<diary_entry::Model>> {
        self.diary_repo.find_by_user(user_id).await
    }

    /// A user's favourite entries.
    pub async fn list_favourites(&self, user_id: &str) -> AppResult<Vec<diary_entry::Model>> {
        self.diary_repo.find_favourites(user_id).await
    }

    /// Create or replace the entry for `date`.
    pub async fn save(
        &self,
        user_id: &str,
        date: NaiveDate,
        input: SaveDiaryEntryInput,
    ) -> AppResult<diary_entry::Model> {
        if date > dates::today() {
            return Err(AppError::Validation(
                "Diary entries cannot be dated in the future".to_string(),
            ));
        }
        input.validate()?;

        let text = input.text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::Validation("Entry text is required".to_string()));
        }
        let title = non_blank(input.title);
        let plant_name = non_blank(input.plant_name);
        let plant_notes = non_blank(input.plant_notes);
        let image_url = non_blank(input.image_url);

        if let Some(existing) = self.diary_repo.find_by_user_and_date(user_id, date).await? {
            let mut active: diary_entry::ActiveModel = existing.into();
            active.title = Set(title);
            active.text = Set(text);
            active.image_url = Set(image_url);
            active.plant_name = Set(plant_name);
            active.plant_condition = Set(input.plant_condition);
            active.plant_notes = Set(plant_notes);
            active.updated_at = Set(Some(chrono::Utc::now().into()));
            return self.diary_repo.update(active).await;
        }

        let model = diary_entry::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            date: Set(date),
            title: Set(title),
            text: Set(text),
            image_url: Set(image_url),
            is_favourite: Set(false),
            plant_name: Set(plant_name),
            plant_condition: Set(input.plant_condition),
            plant_notes: Set(plant_notes),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.diary_repo.create(model).await?;
        tracing::debug!(user_id = %user_id, date = %date, "Diary entry created");
        Ok(created)
    }

    /// Delete one of the user's entries.
    pub async fn delete(&self, user_id: &str, entry_id: &str) -> AppResult<()> {
        let entry = self.get_owned(user_id, entry_id).await?;
        self.diary_repo.delete(entry).await
    }

    /// Flip the favourite flag of one of the user's entries.
    pub async fn toggle_favourite(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> AppResult<diary_entry::Model> {
        let entry = self.get_owned(user_id, entry_id).await?;
        let favourite = !entry.is_favourite;

        let mut active: diary_entry::ActiveModel = entry.into();
        active.is_favourite = Set(favourite);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.diary_repo.update(active).await
    }

    async fn get_owned(&self, user_id: &str, entry_id: &str) -> AppResult<diary_entry::Model> {
        self.diary_repo
            .find_by_id(entry_id)
            .await?
            .filter(|e| e.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Diary entry not found: {entry_id}")))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
