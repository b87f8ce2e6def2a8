//! Error types for the storage layer.

use thiserror::Error;

/// Unified error type for store operations on either backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite connection or statement error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error from the key-value backend.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error on write.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored schema version disagrees with the code after migrating.
    #[error("Schema version mismatch: expected v{expected}, found v{found}")]
    SchemaMismatch { expected: i64, found: i64 },

    /// A character with this uid already exists.
    #[error("Character uid already exists: {0}")]
    DuplicateUid(String),
}

impl StorageError {
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
