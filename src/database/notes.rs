//! Guild note database operations

use std::future::Future;

use super::error::Result;
use super::models::NoteRecord;
use super::Database;

/// Extension trait for guild note database operations
pub trait NoteOps {
    fn fetch_notes(&self) -> impl Future<Output = Result<Vec<NoteRecord>>> + Send;
    fn insert_note(&self, title: &str) -> impl Future<Output = Result<NoteRecord>> + Send;
    fn remove_note(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

impl NoteOps for Database {
    async fn fetch_notes(&self) -> Result<Vec<NoteRecord>> {
        let notes = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, created_at FROM guild_notes ORDER BY id DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(notes)
    }

    async fn insert_note(&self, title: &str) -> Result<NoteRecord> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query("INSERT INTO guild_notes (title, created_at) VALUES (?, ?)")
            .bind(title)
            .bind(&created_at)
            .execute(self.pool())
            .await?;

        Ok(NoteRecord {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            created_at,
        })
    }

    async fn remove_note(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM guild_notes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            tracing::debug!(id, "No note to delete");
        }
        Ok(())
    }
}
