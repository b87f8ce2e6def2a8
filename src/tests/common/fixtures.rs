//! Test Fixtures
//!
//! Provides shared test helpers for creating initialized stores and
//! character records.

use tempfile::TempDir;

use crate::core::character_gen::{AbilityScores, Gender};
use crate::database::{CharacterRecord, Database, GuildStore, JsonStore};

// =============================================================================
// Store Fixtures
// =============================================================================

/// Create a migrated test database in a temporary directory.
/// Returns both the database and the TempDir (which must be kept alive).
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(temp_dir.path())
        .await
        .expect("Failed to create test database");
    db.initialize().await.expect("Failed to migrate test database");
    (db, temp_dir)
}

/// Create an initialized key-value store in a temporary directory.
pub async fn create_test_json_store() -> (JsonStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = JsonStore::new(temp_dir.path().join("kv"));
    store
        .initialize()
        .await
        .expect("Failed to initialize test store");
    (store, temp_dir)
}

// =============================================================================
// Character Fixtures
// =============================================================================

/// A fixed character record with the given uid and name.
pub fn create_test_character(uid: &str, name: &str) -> CharacterRecord {
    CharacterRecord {
        uid: uid.to_string(),
        character_name: name.to_string(),
        gender: Gender::Female,
        class_name: "Wizard".to_string(),
        race: "Elf".to_string(),
        scores: AbilityScores {
            strength: 8,
            dexterity: 16,
            constitution: 14,
            intelligence: 16,
            wisdom: 10,
            charisma: 8,
        },
        phys_desc: vec!["scar-01".to_string()],
        meta_desc: Vec::new(),
        base_description: String::new(),
    }
}
