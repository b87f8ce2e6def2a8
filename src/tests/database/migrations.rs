//! Migration Tests
//!
//! Fresh databases, repeated startup and upgrades of databases written by
//! older builds.

use tempfile::TempDir;

use crate::core::character_gen::Gender;
use crate::database::{Database, GuildStore, StorageError, LATEST_SCHEMA_VERSION};
use crate::tests::common::create_test_db;

/// Open a database without migrating it.
async fn open_unmigrated() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(temp_dir.path())
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

/// Recreate the layout of a version 2 database, before the gender column.
async fn seed_v2_schema(db: &Database, with_gender_column: bool) {
    let statements = [
        "CREATE TABLE schema_version (id INTEGER PRIMARY KEY CHECK (id = 1), version INTEGER NOT NULL DEFAULT 0)",
        "INSERT INTO schema_version (id, version) VALUES (1, 2)",
        "CREATE TABLE guild_notes (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL, created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP)",
        "CREATE TABLE guild_characters (uid TEXT PRIMARY KEY NOT NULL, character_name TEXT NOT NULL, class TEXT NOT NULL, \
         strength INTEGER NOT NULL, dexterity INTEGER NOT NULL, constitution INTEGER NOT NULL, \
         intelligence INTEGER NOT NULL, wisdom INTEGER NOT NULL, charisma INTEGER NOT NULL, \
         phys_desc TEXT NOT NULL DEFAULT '[]', meta_desc TEXT NOT NULL DEFAULT '[]', race TEXT NOT NULL, \
         base_description TEXT NOT NULL DEFAULT '')",
        "INSERT INTO guild_characters (uid, character_name, class, strength, dexterity, constitution, \
         intelligence, wisdom, charisma, race) VALUES ('old-1', 'Old Timer', 'Fighter', 15, 12, 14, 8, 10, 8, 'Dwarf')",
    ];
    for sql in statements {
        sqlx::query(sql)
            .execute(db.pool())
            .await
            .expect("Failed to seed v2 schema");
    }
    if with_gender_column {
        sqlx::query("ALTER TABLE guild_characters ADD COLUMN gender TEXT NOT NULL DEFAULT 'unknown'")
            .execute(db.pool())
            .await
            .expect("Failed to add gender column");
    }
}

async fn gender_column_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info('guild_characters') WHERE name = 'gender'")
        .fetch_one(db.pool())
        .await
        .expect("Failed to inspect columns")
}

#[tokio::test]
async fn test_fresh_database_reaches_latest_version() {
    let (db, _temp) = create_test_db().await;

    assert_eq!(
        db.schema_version().await.expect("Failed to read version"),
        LATEST_SCHEMA_VERSION
    );
    assert_eq!(gender_column_count(&db).await, 1);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let (db, _temp) = create_test_db().await;

    db.add_note("before restart").await.expect("Failed to add note");
    db.initialize().await.expect("Second initialize failed");
    db.initialize().await.expect("Third initialize failed");

    assert_eq!(
        db.schema_version().await.expect("Failed to read version"),
        LATEST_SCHEMA_VERSION
    );
    assert_eq!(gender_column_count(&db).await, 1);
    assert_eq!(db.list_notes().await.expect("Failed to list notes").len(), 1);
}

#[tokio::test]
async fn test_upgrade_from_v2_adds_gender() {
    let (db, _temp) = open_unmigrated().await;
    seed_v2_schema(&db, false).await;

    db.initialize().await.expect("Upgrade failed");

    assert_eq!(
        db.schema_version().await.expect("Failed to read version"),
        LATEST_SCHEMA_VERSION
    );
    let characters = db.list_characters().await.expect("Failed to list characters");
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].character_name, "Old Timer");
    assert_eq!(characters[0].gender, Gender::Unknown);
}

#[tokio::test]
async fn test_upgrade_skips_existing_gender_column() {
    let (db, _temp) = open_unmigrated().await;
    seed_v2_schema(&db, true).await;

    db.initialize().await.expect("Upgrade failed");

    assert_eq!(gender_column_count(&db).await, 1);
    assert_eq!(
        db.schema_version().await.expect("Failed to read version"),
        LATEST_SCHEMA_VERSION
    );
}

#[tokio::test]
async fn test_newer_schema_is_rejected() {
    let (db, _temp) = open_unmigrated().await;

    sqlx::query("CREATE TABLE schema_version (id INTEGER PRIMARY KEY CHECK (id = 1), version INTEGER NOT NULL DEFAULT 0)")
        .execute(db.pool())
        .await
        .expect("Failed to create version table");
    sqlx::query("INSERT INTO schema_version (id, version) VALUES (1, 99)")
        .execute(db.pool())
        .await
        .expect("Failed to set version");

    let result = db.initialize().await;

    assert!(matches!(
        result,
        Err(StorageError::SchemaMismatch { expected, found: 99 }) if expected == LATEST_SCHEMA_VERSION
    ));
}
