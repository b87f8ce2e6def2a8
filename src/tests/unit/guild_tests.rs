//! Guild Service Tests

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::character_gen::{CharacterRequest, Gender, SCORE_CEILING, SCORE_FLOOR};
use crate::core::guild::{Guild, GuildError};
use crate::database::{self, CharacterRecord, GuildStore, NoteRecord, StorageError};
use crate::tests::common::{create_test_db, create_test_json_store};

/// Store whose every call fails.
struct FailingStore;

fn broken() -> StorageError {
    StorageError::io("guild.db", std::io::Error::other("disk on fire"))
}

#[async_trait]
impl GuildStore for FailingStore {
    async fn initialize(&self) -> database::Result<()> {
        Err(broken())
    }
    async fn schema_version(&self) -> database::Result<i64> {
        Err(broken())
    }
    async fn list_notes(&self) -> database::Result<Vec<NoteRecord>> {
        Err(broken())
    }
    async fn add_note(&self, _title: &str) -> database::Result<NoteRecord> {
        Err(broken())
    }
    async fn delete_note(&self, _id: i64) -> database::Result<()> {
        Err(broken())
    }
    async fn list_characters(&self) -> database::Result<Vec<CharacterRecord>> {
        Err(broken())
    }
    async fn insert_character(&self, _character: &CharacterRecord) -> database::Result<()> {
        Err(broken())
    }
    async fn clear_characters(&self) -> database::Result<()> {
        Err(broken())
    }
    fn name(&self) -> &str {
        "failing"
    }
}

fn wizard_request() -> CharacterRequest {
    CharacterRequest {
        name: String::new(),
        race: "Elf".to_string(),
        class_name: "Wizard".to_string(),
        gender: Gender::Female,
    }
}

#[tokio::test]
async fn test_blank_note_is_ignored() {
    let (db, _temp) = create_test_db().await;
    let guild = Guild::new(Arc::new(db));

    let result = guild.add_note("   \n\t").await.expect("Blank note should not error");

    assert!(result.is_none());
    assert!(guild.notes().await.expect("Failed to list notes").is_empty());
}

#[tokio::test]
async fn test_note_title_is_trimmed() {
    let (db, _temp) = create_test_db().await;
    let guild = Guild::new(Arc::new(db));

    let note = guild
        .add_note("  Pay the blacksmith  ")
        .await
        .expect("Failed to add note")
        .expect("Note should be stored");

    assert_eq!(note.title, "Pay the blacksmith");
}

#[tokio::test]
async fn test_missing_race_or_class() {
    let (db, _temp) = create_test_db().await;
    let guild = Guild::new(Arc::new(db));
    let mut rng = StdRng::seed_from_u64(1);

    let mut request = wizard_request();
    request.race = "  ".to_string();
    let err = guild
        .create_character(&request, &mut rng)
        .await
        .expect_err("Missing race should fail");
    assert!(matches!(err, GuildError::MissingField("race")));

    let mut request = wizard_request();
    request.class_name = String::new();
    let err = guild
        .create_character(&request, &mut rng)
        .await
        .expect_err("Missing class should fail");
    assert!(matches!(err, GuildError::MissingField("class")));

    assert!(guild.characters().await.expect("Failed to list characters").is_empty());
}

#[tokio::test]
async fn test_create_then_list_character() {
    let (store, _temp) = create_test_json_store().await;
    let guild = Guild::new(Arc::new(store));
    let mut rng = StdRng::seed_from_u64(42);

    let created = guild
        .create_character(&wizard_request(), &mut rng)
        .await
        .expect("Failed to create character");

    assert_eq!(created.race, "Elf");
    assert_eq!(created.gender, Gender::Female);
    assert!(!created.character_name.is_empty());
    for (_, score) in created.scores.iter() {
        assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&score));
    }

    let characters = guild.characters().await.expect("Failed to list characters");
    assert_eq!(characters, vec![created]);
}

#[tokio::test]
async fn test_given_name_is_kept() {
    let (db, _temp) = create_test_db().await;
    let guild = Guild::new(Arc::new(db));
    let mut rng = StdRng::seed_from_u64(3);

    let mut request = wizard_request();
    request.name = " Morgana ".to_string();
    let created = guild
        .create_character(&request, &mut rng)
        .await
        .expect("Failed to create character");

    assert_eq!(created.character_name, "Morgana");
}

#[tokio::test]
async fn test_clear_characters() {
    let (db, _temp) = create_test_db().await;
    let guild = Guild::new(Arc::new(db));
    let mut rng = StdRng::seed_from_u64(5);

    guild
        .create_character(&wizard_request(), &mut rng)
        .await
        .expect("Failed to create character");
    guild.clear_characters().await.expect("Failed to clear characters");

    assert!(guild.characters().await.expect("Failed to list characters").is_empty());
}

#[tokio::test]
async fn test_storage_failures_map_to_user_messages() {
    let guild = Guild::new(Arc::new(FailingStore));
    let mut rng = StdRng::seed_from_u64(9);

    let err = guild.open().await.expect_err("open should fail");
    assert!(matches!(err, GuildError::Initialize(_)));

    let err = guild.notes().await.expect_err("notes should fail");
    assert_eq!(err.to_string(), "Could not load notes from the local database.");
    assert!(err.storage_error().is_some());

    let err = guild.add_note("x").await.expect_err("add should fail");
    assert_eq!(err.to_string(), "Could not save your note.");

    let err = guild.delete_note(1).await.expect_err("delete should fail");
    assert!(matches!(err, GuildError::DeleteNote(_)));

    let err = guild
        .create_character(&wizard_request(), &mut rng)
        .await
        .expect_err("create should fail");
    assert_eq!(err.to_string(), "Could not save character.");

    let err = guild.characters().await.expect_err("list should fail");
    assert!(matches!(err, GuildError::LoadCharacters(_)));

    let err = guild.clear_characters().await.expect_err("clear should fail");
    assert!(matches!(err, GuildError::ClearCharacters(_)));
}

#[tokio::test]
async fn test_blank_note_skips_failing_store() {
    let guild = Guild::new(Arc::new(FailingStore));
    assert!(guild.add_note("").await.expect("Blank note should not reach the store").is_none());
}
