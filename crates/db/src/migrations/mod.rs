//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_user_stats_table;
mod m20250601_000003_create_notification_preference_table;
mod m20250601_000004_create_prediction_table;
mod m20250601_000005_create_report_table;
mod m20250601_000006_create_notification_table;
mod m20250601_000007_create_diary_entry_table;
mod m20250601_000008_create_green_space_tables;
mod m20250601_000009_create_forum_tables;
mod m20250601_000010_create_survey_tables;
mod m20250601_000011_create_activity_log_table;
mod m20250601_000012_create_notification_read_table;
mod m20250601_000013_create_learning_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_user_stats_table::Migration),
            Box::new(m20250601_000003_create_notification_preference_table::Migration),
            Box::new(m20250601_000004_create_prediction_table::Migration),
            Box::new(m20250601_000005_create_report_table::Migration),
            Box::new(m20250601_000006_create_notification_table::Migration),
            Box::new(m20250601_000007_create_diary_entry_table::Migration),
            Box::new(m20250601_000008_create_green_space_tables::Migration),
            Box::new(m20250601_000009_create_forum_tables::Migration),
            Box::new(m20250601_000010_create_survey_tables::Migration),
            Box::new(m20250601_000011_create_activity_log_table::Migration),
            Box::new(m20250601_000012_create_notification_read_table::Migration),
            Box::new(m20250601_000013_create_learning_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_names_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 13);
    }
}
