//! Character Generation
//!
//! Builds point-buy characters from a race, a class and an optional gender.
//! The class picks a priority ordering over the six ability scores, the
//! allocator in [`point_buy`] spends the budget along that ordering, and
//! [`racial`] layers the ancestry bonuses on top.

pub mod point_buy;
pub mod racial;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::name_gen;
use crate::database::CharacterRecord;

pub use point_buy::{allocate, PointBuy, POINT_BUY_BUDGET};
pub use racial::{racial_bonus, RacialBonus};

// ============================================================================
// Abilities
// ============================================================================

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter sheet abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Floor every score starts from.
pub const SCORE_FLOOR: i32 = 8;

/// Hard ceiling after racial bonuses.
pub const SCORE_CEILING: i32 = 20;

/// The six ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: SCORE_FLOOR,
            dexterity: SCORE_FLOOR,
            constitution: SCORE_FLOOR,
            intelligence: SCORE_FLOOR,
            wisdom: SCORE_FLOOR,
            charisma: SCORE_FLOOR,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut i32 {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    /// Add `amount` to a score, clamping at [`SCORE_CEILING`].
    pub fn add_capped(&mut self, ability: Ability, amount: i32) {
        let score = self.get_mut(ability);
        *score = (*score + amount).min(SCORE_CEILING);
    }

    /// Iterate `(ability, score)` pairs in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.iter().map(move |&a| (a, self.get(a)))
    }
}

impl fmt::Display for AbilityScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(ability, score)| format!("{ability} {score}"))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

// ============================================================================
// Gender
// ============================================================================

/// Character gender as stored on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Lenient parse; anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Class Priorities
// ============================================================================

/// Ordering used when the class is not recognized.
pub const DEFAULT_PRIORITY: [Ability; 6] = Ability::ALL;

/// Ability priority for a class name (trimmed, case-insensitive).
pub fn class_priority(class_name: &str) -> [Ability; 6] {
    use Ability::*;

    match class_name.trim().to_lowercase().as_str() {
        "barbarian" | "fighter" => [Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
        "bard" => [Charisma, Dexterity, Constitution, Wisdom, Intelligence, Strength],
        "cleric" => [Wisdom, Constitution, Strength, Charisma, Dexterity, Intelligence],
        "druid" => [Wisdom, Constitution, Dexterity, Intelligence, Charisma, Strength],
        "monk" => [Dexterity, Wisdom, Constitution, Strength, Intelligence, Charisma],
        "paladin" => [Strength, Charisma, Constitution, Wisdom, Dexterity, Intelligence],
        "ranger" => [Dexterity, Wisdom, Constitution, Strength, Charisma, Intelligence],
        "rogue" => [Dexterity, Constitution, Wisdom, Charisma, Intelligence, Strength],
        "sorcerer" | "warlock" => [Charisma, Constitution, Dexterity, Wisdom, Intelligence, Strength],
        "wizard" => [Intelligence, Constitution, Dexterity, Wisdom, Charisma, Strength],
        _ => DEFAULT_PRIORITY,
    }
}

// ============================================================================
// Character Assembly
// ============================================================================

/// Input for generating a character.
#[derive(Debug, Clone, Default)]
pub struct CharacterRequest {
    /// Leave blank to roll a name from the name generator.
    pub name: String,
    pub race: String,
    pub class_name: String,
    pub gender: Gender,
}

/// Fresh client-side identifier for a character.
pub fn new_character_uid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a complete character record.
///
/// Name, race and class are trimmed. A blank name is replaced by a
/// generated one matching the requested gender.
pub fn generate_character<R: Rng + ?Sized>(request: &CharacterRequest, rng: &mut R) -> CharacterRecord {
    let race = request.race.trim().to_string();
    let class_name = request.class_name.trim().to_string();
    let priority = class_priority(&class_name);
    let scores = allocate(&priority, &race, rng);

    let name = match request.name.trim() {
        "" => name_gen::generate(Some(request.gender), rng),
        given => given.to_string(),
    };

    CharacterRecord {
        uid: new_character_uid(),
        character_name: name,
        gender: request.gender,
        class_name,
        race,
        scores,
        phys_desc: Vec::new(),
        meta_desc: Vec::new(),
        base_description: String::new(),
    }
}
