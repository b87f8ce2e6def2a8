//! Persisted Records
//!
//! Notes and characters as handed out by the store. Callers only ever hold
//! copies; the store owns the rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::character_gen::{AbilityScores, Gender};

// ============================================================================
// Note Record
// ============================================================================

/// Guild note database record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NoteRecord {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

// ============================================================================
// Character Record
// ============================================================================

/// Generated character record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub uid: String,
    pub character_name: String,
    pub gender: Gender,
    pub class_name: String,
    pub race: String,
    pub scores: AbilityScores,
    pub phys_desc: Vec<String>,
    pub meta_desc: Vec<String>,
    pub base_description: String,
}

/// Flat row shape shared by both backends. Reference-id lists stay as
/// serialized JSON arrays until decoded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CharacterRow {
    pub uid: String,
    pub character_name: String,
    #[serde(default = "unknown_gender")]
    pub gender: String,
    #[sqlx(rename = "class")]
    #[serde(rename = "class")]
    pub class_name: String,
    pub race: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    #[serde(default, deserialize_with = "reference_ids_text")]
    pub phys_desc: String,
    #[serde(default, deserialize_with = "reference_ids_text")]
    pub meta_desc: String,
    pub base_description: String,
}

fn unknown_gender() -> String {
    Gender::Unknown.as_str().to_string()
}

/// Accept any JSON value for a reference-id field so one bad field never
/// drops the row. Text passes through, an inline array is re-serialized,
/// anything else becomes empty text and decodes to `[]`.
fn reference_ids_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        array @ serde_json::Value::Array(_) => array.to_string(),
        _ => String::new(),
    })
}

/// Decode a stored reference-id array. Anything unparseable becomes empty.
pub fn decode_reference_ids(raw: &str, uid: &str, field: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(uid, field, error = %e, "Unreadable reference ids, using empty list");
            Vec::new()
        }
    }
}

/// Encode reference ids for storage.
pub fn encode_reference_ids(ids: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(ids)
}

impl From<CharacterRow> for CharacterRecord {
    fn from(row: CharacterRow) -> Self {
        let phys_desc = decode_reference_ids(&row.phys_desc, &row.uid, "phys_desc");
        let meta_desc = decode_reference_ids(&row.meta_desc, &row.uid, "meta_desc");
        Self {
            gender: Gender::parse(&row.gender),
            scores: AbilityScores {
                strength: row.strength,
                dexterity: row.dexterity,
                constitution: row.constitution,
                intelligence: row.intelligence,
                wisdom: row.wisdom,
                charisma: row.charisma,
            },
            uid: row.uid,
            character_name: row.character_name,
            class_name: row.class_name,
            race: row.race,
            phys_desc,
            meta_desc,
            base_description: row.base_description,
        }
    }
}

impl TryFrom<&CharacterRecord> for CharacterRow {
    type Error = serde_json::Error;

    fn try_from(record: &CharacterRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: record.uid.clone(),
            character_name: record.character_name.clone(),
            gender: record.gender.as_str().to_string(),
            class_name: record.class_name.clone(),
            race: record.race.clone(),
            strength: record.scores.strength,
            dexterity: record.scores.dexterity,
            constitution: record.scores.constitution,
            intelligence: record.scores.intelligence,
            wisdom: record.scores.wisdom,
            charisma: record.scores.charisma,
            phys_desc: encode_reference_ids(&record.phys_desc)?,
            meta_desc: encode_reference_ids(&record.meta_desc)?,
            base_description: record.base_description.clone(),
        })
    }
}
