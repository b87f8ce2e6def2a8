//! Local Store Module
//!
//! Persists guild notes and generated characters. Two backends implement
//! the [`GuildStore`] port:
//!
//! - [`Database`] - SQLite through sqlx, with versioned migrations
//! - [`JsonStore`] - key-value fallback keeping each collection as one
//!   JSON container file
//!
//! The backend is chosen once at composition time with [`open_store`].

mod characters;
mod error;
mod json_store;
mod migrations;
mod models;
mod notes;
mod store;

pub use characters::CharacterOps;
pub use error::{Result, StorageError};
pub use json_store::JsonStore;
pub use migrations::{get_current_version, run_migrations, LATEST_SCHEMA_VERSION, MIGRATIONS};
pub use models::*;
pub use notes::NoteOps;
pub use store::GuildStore;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{AppConfig, StorageBackend};

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "guild.db";

/// SQLite connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open (creating if missing) `guild.db` in `data_dir`.
    ///
    /// Does not migrate; call [`GuildStore::initialize`] before use.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join(DATABASE_FILE);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent.display(), e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %db_path.display(), "Opened SQLite database");

        Ok(Self { pool, path: db_path })
    }

    /// Get the underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl GuildStore for Database {
    async fn initialize(&self) -> Result<()> {
        run_migrations(&self.pool).await
    }

    async fn schema_version(&self) -> Result<i64> {
        get_current_version(&self.pool).await
    }

    async fn list_notes(&self) -> Result<Vec<NoteRecord>> {
        self.fetch_notes().await
    }

    async fn add_note(&self, title: &str) -> Result<NoteRecord> {
        self.insert_note(title).await
    }

    async fn delete_note(&self, id: i64) -> Result<()> {
        self.remove_note(id).await
    }

    async fn list_characters(&self) -> Result<Vec<CharacterRecord>> {
        self.fetch_characters().await
    }

    async fn insert_character(&self, character: &CharacterRecord) -> Result<()> {
        self.save_character(character).await
    }

    async fn clear_characters(&self) -> Result<()> {
        self.remove_all_characters().await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// Open the backend selected in `config` for its data directory.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn GuildStore>> {
    let data_dir = config.data_dir();
    let store: Arc<dyn GuildStore> = match config.storage.backend {
        StorageBackend::Sqlite => Arc::new(Database::new(&data_dir).await?),
        StorageBackend::Json => Arc::new(JsonStore::new(data_dir.join("kv"))),
    };
    tracing::info!(backend = store.name(), data_dir = %data_dir.display(), "Storage backend selected");
    Ok(store)
}
