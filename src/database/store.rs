//! Storage port shared by the SQLite database and the key-value fallback.
//!
//! Both backends honour the same contract:
//!
//! - notes list newest first, deleting a missing id is a no-op
//! - characters list by name ascending, unreadable reference ids decode to `[]`
//! - duplicate character uids are rejected
//! - `initialize` is idempotent and must succeed before anything else runs

use async_trait::async_trait;

use super::error::Result;
use super::models::{CharacterRecord, NoteRecord};

/// Trait for guild storage backends.
///
/// Implementations must be `Send + Sync` so one handle can be shared with
/// the service layer behind an `Arc`.
#[async_trait]
pub trait GuildStore: Send + Sync {
    /// Apply pending schema migrations and verify the final version.
    ///
    /// Safe to call on every start. Fails with
    /// [`StorageError::SchemaMismatch`](super::StorageError::SchemaMismatch)
    /// when the stored version does not end at the latest version.
    async fn initialize(&self) -> Result<()>;

    /// Currently stored schema version (0 before the first migration).
    async fn schema_version(&self) -> Result<i64>;

    /// All notes, newest first.
    async fn list_notes(&self) -> Result<Vec<NoteRecord>>;

    /// Persist a note and return it with its assigned id and timestamp.
    async fn add_note(&self, title: &str) -> Result<NoteRecord>;

    /// Remove a note. Unknown ids are not an error.
    async fn delete_note(&self, id: i64) -> Result<()>;

    /// All characters ordered by name.
    async fn list_characters(&self) -> Result<Vec<CharacterRecord>>;

    /// Append one character.
    async fn insert_character(&self, character: &CharacterRecord) -> Result<()>;

    /// Remove every character.
    async fn clear_characters(&self) -> Result<()>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}
