//! Character database operations
//!
//! Reference-id lists are stored as JSON array text and decoded leniently
//! on the way out.

use std::future::Future;

use super::error::{Result, StorageError};
use super::models::{CharacterRecord, CharacterRow};
use super::Database;

/// Extension trait for character-related database operations
pub trait CharacterOps {
    fn save_character(&self, character: &CharacterRecord) -> impl Future<Output = Result<()>> + Send;
    fn fetch_characters(&self) -> impl Future<Output = Result<Vec<CharacterRecord>>> + Send;
    fn remove_all_characters(&self) -> impl Future<Output = Result<()>> + Send;
}

impl CharacterOps for Database {
    async fn save_character(&self, character: &CharacterRecord) -> Result<()> {
        let row = CharacterRow::try_from(character)?;

        let result = sqlx::query(
            r#"
            INSERT INTO guild_characters
            (uid, character_name, gender, class, strength, dexterity, constitution,
             intelligence, wisdom, charisma, phys_desc, meta_desc, race, base_description)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.uid)
        .bind(&row.character_name)
        .bind(&row.gender)
        .bind(&row.class_name)
        .bind(row.strength)
        .bind(row.dexterity)
        .bind(row.constitution)
        .bind(row.intelligence)
        .bind(row.wisdom)
        .bind(row.charisma)
        .bind(&row.phys_desc)
        .bind(&row.meta_desc)
        .bind(&row.race)
        .bind(&row.base_description)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StorageError::DuplicateUid(row.uid))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>> {
        let rows = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT uid, character_name, gender, class, strength, dexterity, constitution,
                   intelligence, wisdom, charisma, phys_desc, meta_desc, race, base_description
            FROM guild_characters
            ORDER BY character_name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(CharacterRecord::from).collect())
    }

    async fn remove_all_characters(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM guild_characters")
            .execute(self.pool())
            .await?;
        tracing::info!(removed = result.rows_affected(), "Cleared characters");
        Ok(())
    }
}
