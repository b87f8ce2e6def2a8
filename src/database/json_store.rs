//! Key-value storage backend for platforms without SQLite.
//!
//! Each collection is one JSON container stored under a fixed key:
//!
//! ```text
//! <dir>/guild_notes.json        [ { "id": 2, "title": "...", "created_at": "..." }, ... ]
//! <dir>/guild_characters.json   [ { "uid": "...", "class": "...", "phys_desc": "[]", ... }, ... ]
//! <dir>/schema_version.json     { "version": 3 }
//! ```
//!
//! Every operation reads the whole container, modifies it and writes it back
//! through a temp file + rename, so a failed write leaves the previous
//! container intact. An unreadable container is treated as empty. Writes
//! work on the raw rows, so a row that fails to decode is skipped when
//! listing but kept on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::error::{Result, StorageError};
use super::migrations::LATEST_SCHEMA_VERSION;
use super::models::{CharacterRecord, CharacterRow, NoteRecord};
use super::store::GuildStore;

const NOTES_KEY: &str = "guild_notes";
const CHARACTERS_KEY: &str = "guild_characters";
const VERSION_KEY: &str = "schema_version";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
struct VersionMarker {
    version: i64,
}

/// `id` of a raw note row, if readable.
fn row_id(row: &serde_json::Value) -> Option<i64> {
    row.get("id")?.as_i64()
}

/// `uid` of a raw character row, if readable.
fn row_uid(row: &serde_json::Value) -> Option<&str> {
    row.get("uid")?.as_str()
}

/// JSON-file key-value store.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Store rooted at `dir`. Nothing touches the disk until the first call.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the containers.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the container for `key`.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Raw container text, `None` when the key was never written.
    async fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path.display(), e)),
        }
    }

    /// Read a container as a list of raw JSON rows.
    async fn read_rows(&self, key: &str) -> Result<Vec<serde_json::Value>> {
        let Some(content) = self.read_raw(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                warn!(key, error = %e, "Unreadable container, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Read a container, decoding rows one by one and skipping bad ones.
    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let rows = self.read_rows(key).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(key, error = %e, "Skipping unreadable row");
                    None
                }
            })
            .collect())
    }

    /// Write a container atomically.
    #[instrument(skip(self, value))]
    async fn write_value<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::io(self.dir.display(), e))?;

        let content = serde_json::to_string_pretty(value)?;
        let path = self.key_path(key);
        let temp_path = path.with_extension("tmp");

        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| StorageError::io(temp_path.display(), e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io(path.display(), e));
        }

        Ok(())
    }

    async fn read_version(&self) -> Result<i64> {
        let Some(content) = self.read_raw(VERSION_KEY).await? else {
            return Ok(0);
        };
        match serde_json::from_str::<VersionMarker>(&content) {
            Ok(marker) => Ok(marker.version),
            Err(e) => {
                warn!(error = %e, "Unreadable schema version, assuming v0");
                Ok(0)
            }
        }
    }

    async fn write_version(&self, version: i64) -> Result<()> {
        self.write_value(VERSION_KEY, &VersionMarker { version }).await
    }

    /// Create an empty container unless one already exists.
    async fn ensure_container(&self, key: &str) -> Result<()> {
        if self.read_raw(key).await?.is_none() {
            self.write_value(key, &Vec::<serde_json::Value>::new()).await?;
        }
        Ok(())
    }

    /// Give rows written before the gender field an explicit `unknown`.
    async fn backfill_gender(&self) -> Result<()> {
        let mut rows = self.read_rows(CHARACTERS_KEY).await?;
        let mut changed = 0usize;
        for row in rows.iter_mut() {
            if let Some(object) = row.as_object_mut() {
                if !object.contains_key("gender") {
                    object.insert("gender".to_string(), serde_json::Value::from("unknown"));
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            debug!(changed, "Backfilled character gender");
            self.write_value(CHARACTERS_KEY, &rows).await?;
        }
        Ok(())
    }

    async fn run_migration(&self, version: i64) -> Result<()> {
        match version {
            1 => self.ensure_container(NOTES_KEY).await?,
            2 => self.ensure_container(CHARACTERS_KEY).await?,
            3 => self.backfill_gender().await?,
            _ => return Ok(()),
        }
        self.write_version(version).await
    }
}

#[async_trait]
impl GuildStore for JsonStore {
    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<()> {
        let current_version = self.read_version().await?;
        info!(current_version, target_version = LATEST_SCHEMA_VERSION, "Checking key-value store migrations");

        for version in (current_version + 1)..=LATEST_SCHEMA_VERSION {
            info!(version, "Applying key-value migration");
            self.run_migration(version).await?;
        }

        let final_version = self.read_version().await?;
        if final_version != LATEST_SCHEMA_VERSION {
            return Err(StorageError::SchemaMismatch {
                expected: LATEST_SCHEMA_VERSION,
                found: final_version,
            });
        }
        Ok(())
    }

    async fn schema_version(&self) -> Result<i64> {
        self.read_version().await
    }

    async fn list_notes(&self) -> Result<Vec<NoteRecord>> {
        let mut notes: Vec<NoteRecord> = self.read_collection(NOTES_KEY).await?;
        notes.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(notes)
    }

    async fn add_note(&self, title: &str) -> Result<NoteRecord> {
        let mut rows = self.read_rows(NOTES_KEY).await?;
        let next_id = rows.iter().filter_map(row_id).max().unwrap_or(0) + 1;
        let note = NoteRecord {
            id: next_id,
            title: title.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        rows.push(serde_json::to_value(&note)?);
        self.write_value(NOTES_KEY, &rows).await?;
        Ok(note)
    }

    async fn delete_note(&self, id: i64) -> Result<()> {
        let mut rows = self.read_rows(NOTES_KEY).await?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        if rows.len() == before {
            debug!(id, "No note to delete");
            return Ok(());
        }
        self.write_value(NOTES_KEY, &rows).await
    }

    async fn list_characters(&self) -> Result<Vec<CharacterRecord>> {
        let rows: Vec<CharacterRow> = self.read_collection(CHARACTERS_KEY).await?;
        let mut characters: Vec<CharacterRecord> = rows.into_iter().map(CharacterRecord::from).collect();
        characters.sort_by(|a, b| a.character_name.cmp(&b.character_name));
        Ok(characters)
    }

    async fn insert_character(&self, character: &CharacterRecord) -> Result<()> {
        let mut rows = self.read_rows(CHARACTERS_KEY).await?;
        if rows.iter().any(|row| row_uid(row) == Some(character.uid.as_str())) {
            return Err(StorageError::DuplicateUid(character.uid.clone()));
        }
        rows.push(serde_json::to_value(CharacterRow::try_from(character)?)?);
        self.write_value(CHARACTERS_KEY, &rows).await
    }

    async fn clear_characters(&self) -> Result<()> {
        self.write_value(CHARACTERS_KEY, &Vec::<CharacterRow>::new()).await
    }

    fn name(&self) -> &str {
        "json"
    }
}
