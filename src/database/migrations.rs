//! Database Migrations
//!
//! Versioned, idempotent schema migrations for the SQLite backend.
//!
//! The current version lives in the single-row `schema_version` table. Each
//! pending migration runs its steps and bumps the version inside one
//! transaction, so a failed step leaves the previous version in place.

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use super::error::{Result, StorageError};

/// Latest schema version known to this build.
pub const LATEST_SCHEMA_VERSION: i64 = 3;

/// One idempotent schema change.
#[derive(Debug, Clone, Copy)]
pub enum MigrationStep {
    /// Statement that is already idempotent (`IF NOT EXISTS`).
    Sql(&'static str),
    /// `ALTER TABLE ... ADD COLUMN`, skipped when the column exists.
    AddColumn {
        table: &'static str,
        column: &'static str,
        definition: &'static str,
    },
}

/// A numbered migration.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub steps: &'static [MigrationStep],
}

/// All migrations in ascending version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "guild_notes",
        steps: &[MigrationStep::Sql(MIGRATION_V1_NOTES)],
    },
    Migration {
        version: 2,
        name: "guild_characters",
        steps: &[
            MigrationStep::Sql(MIGRATION_V2_CHARACTERS),
            MigrationStep::Sql(MIGRATION_V2_CHARACTER_NAME_INDEX),
        ],
    },
    Migration {
        version: 3,
        name: "character_gender",
        steps: &[MigrationStep::AddColumn {
            table: "guild_characters",
            column: "gender",
            definition: "TEXT NOT NULL DEFAULT 'unknown'",
        }],
    },
];

/// Run all pending migrations and verify the final version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (id, version) VALUES (1, 0)")
        .execute(pool)
        .await?;

    let current_version = get_current_version(pool).await?;

    info!(current_version, target_version = LATEST_SCHEMA_VERSION, "Checking database migrations");

    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        run_migration(pool, migration).await?;
    }

    let final_version = get_current_version(pool).await?;
    if final_version != LATEST_SCHEMA_VERSION {
        return Err(StorageError::SchemaMismatch {
            expected: LATEST_SCHEMA_VERSION,
            found: final_version,
        });
    }

    Ok(())
}

/// Get the current schema version
pub async fn get_current_version(pool: &SqlitePool) -> Result<i64> {
    let version: Option<i64> = sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

/// Apply one migration and record its version atomically.
async fn run_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    info!("Applying migration v{}: {}", migration.version, migration.name);

    let mut tx = pool.begin().await?;

    for step in migration.steps {
        apply_step(&mut tx, step).await?;
    }

    sqlx::query("UPDATE schema_version SET version = ? WHERE id = 1")
        .bind(migration.version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

async fn apply_step(tx: &mut Transaction<'_, Sqlite>, step: &MigrationStep) -> Result<()> {
    match *step {
        MigrationStep::Sql(sql) => {
            sqlx::query(sql).execute(&mut **tx).await?;
        }
        MigrationStep::AddColumn {
            table,
            column,
            definition,
        } => {
            // SQLite has no ADD COLUMN IF NOT EXISTS
            let exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
                    .bind(table)
                    .bind(column)
                    .fetch_one(&mut **tx)
                    .await?;

            if exists > 0 {
                debug!(table, column, "Column already present, skipping");
            } else {
                let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {definition}");
                sqlx::query(&sql).execute(&mut **tx).await?;
            }
        }
    }
    Ok(())
}

/// Migration v1: guild notes
const MIGRATION_V1_NOTES: &str = r#"
CREATE TABLE IF NOT EXISTS guild_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Migration v2: generated characters
const MIGRATION_V2_CHARACTERS: &str = r#"
CREATE TABLE IF NOT EXISTS guild_characters (
    uid TEXT PRIMARY KEY NOT NULL,
    character_name TEXT NOT NULL,
    class TEXT NOT NULL,
    strength INTEGER NOT NULL,
    dexterity INTEGER NOT NULL,
    constitution INTEGER NOT NULL,
    intelligence INTEGER NOT NULL,
    wisdom INTEGER NOT NULL,
    charisma INTEGER NOT NULL,
    phys_desc TEXT NOT NULL DEFAULT '[]',
    meta_desc TEXT NOT NULL DEFAULT '[]',
    race TEXT NOT NULL,
    base_description TEXT NOT NULL DEFAULT ''
)
"#;

const MIGRATION_V2_CHARACTER_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_guild_characters_name ON guild_characters(character_name)";
