//! Guild Service
//!
//! The caller-facing layer over a [`GuildStore`]. It validates input,
//! builds characters, logs store failures and turns them into one fixed
//! message per operation.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::{error, info};

use crate::core::character_gen::{generate_character, CharacterRequest};
use crate::database::{CharacterRecord, GuildStore, NoteRecord, StorageError};

/// Service errors. The display text is what a user should see; the
/// underlying storage error stays available as the source.
#[derive(Debug, Error)]
pub enum GuildError {
    #[error("Could not load notes from the local database.")]
    LoadNotes(#[source] StorageError),

    #[error("Could not save your note.")]
    SaveNote(#[source] StorageError),

    #[error("Could not delete that note.")]
    DeleteNote(#[source] StorageError),

    #[error("Could not load characters.")]
    LoadCharacters(#[source] StorageError),

    #[error("Could not save character.")]
    SaveCharacter(#[source] StorageError),

    #[error("Could not clear characters.")]
    ClearCharacters(#[source] StorageError),

    #[error("Could not open the local database.")]
    Initialize(#[source] StorageError),

    #[error("A {0} is required.")]
    MissingField(&'static str),
}

impl GuildError {
    /// Underlying storage error, if any.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::LoadNotes(e)
            | Self::SaveNote(e)
            | Self::DeleteNote(e)
            | Self::LoadCharacters(e)
            | Self::SaveCharacter(e)
            | Self::ClearCharacters(e)
            | Self::Initialize(e) => Some(e),
            Self::MissingField(_) => None,
        }
    }
}

/// Log a storage failure at the boundary and wrap it.
fn logged(wrap: fn(StorageError) -> GuildError) -> impl Fn(StorageError) -> GuildError {
    move |e| {
        let err = wrap(e);
        if let Some(source) = err.storage_error() {
            error!(error = %source, "{err}");
        }
        err
    }
}

/// Guild notes and characters over one store handle.
#[derive(Clone)]
pub struct Guild {
    store: Arc<dyn GuildStore>,
}

impl Guild {
    pub fn new(store: Arc<dyn GuildStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn GuildStore> {
        &self.store
    }

    /// Run migrations. Must succeed before any other call.
    pub async fn open(&self) -> Result<(), GuildError> {
        self.store
            .initialize()
            .await
            .map_err(logged(GuildError::Initialize))
    }

    pub async fn notes(&self) -> Result<Vec<NoteRecord>, GuildError> {
        self.store.list_notes().await.map_err(logged(GuildError::LoadNotes))
    }

    /// Add a note. A blank title is ignored and yields `None`.
    pub async fn add_note(&self, title: &str) -> Result<Option<NoteRecord>, GuildError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let note = self
            .store
            .add_note(title)
            .await
            .map_err(logged(GuildError::SaveNote))?;
        info!(id = note.id, "Added note");
        Ok(Some(note))
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), GuildError> {
        self.store
            .delete_note(id)
            .await
            .map_err(logged(GuildError::DeleteNote))
    }

    pub async fn characters(&self) -> Result<Vec<CharacterRecord>, GuildError> {
        self.store
            .list_characters()
            .await
            .map_err(logged(GuildError::LoadCharacters))
    }

    /// Generate and persist a character. Race and class are required.
    pub async fn create_character<R: Rng + ?Sized>(
        &self,
        request: &CharacterRequest,
        rng: &mut R,
    ) -> Result<CharacterRecord, GuildError> {
        if request.race.trim().is_empty() {
            return Err(GuildError::MissingField("race"));
        }
        if request.class_name.trim().is_empty() {
            return Err(GuildError::MissingField("class"));
        }

        let character = generate_character(request, rng);
        self.store
            .insert_character(&character)
            .await
            .map_err(logged(GuildError::SaveCharacter))?;

        info!(uid = %character.uid, name = %character.character_name, "Created character");
        Ok(character)
    }

    pub async fn clear_characters(&self) -> Result<(), GuildError> {
        self.store
            .clear_characters()
            .await
            .map_err(logged(GuildError::ClearCharacters))
    }
}
