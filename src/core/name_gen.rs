//! Name Generator Module
//!
//! Generates compound fantasy names ("Kaelthas Stormwatch") by pairing
//! start and end fragments. Pools are built once per process and never
//! change afterwards.

use std::sync::OnceLock;

use rand::prelude::*;

use crate::core::character_gen::Gender;

// ============================================================================
// Name Components
// ============================================================================

const MALE_FIRST_STARTS: &[&str] = &[
    "Al", "Ar", "Bal", "Bel", "Bor", "Bran", "Cal", "Cor", "Dar", "Del", "Ed", "El", "Fen", "Gar",
    "Had", "Hor", "Ith", "Jar", "Kael", "Kor", "Laz", "Lor", "Mal", "Mor", "Nor", "Or", "Per", "Quin",
    "Ral", "Ren", "Ser", "Tal", "Tor", "Ul", "Val", "Vor", "Wen", "Xan", "Yor", "Zan",
];

const MALE_FIRST_ENDS: &[&str] = &[
    "an", "ar", "as", "ath", "dan", "dar", "den", "dric", "drin", "ek", "en", "er", "eth", "ian",
    "ik", "il", "in", "ion", "is", "or", "orn", "os", "rak", "ric", "rin", "ron", "thas", "thor",
    "tor", "us",
];

const FEMALE_FIRST_STARTS: &[&str] = &[
    "Ael", "Ara", "Bel", "Bri", "Cae", "Cali", "Dae", "Dela", "Eli", "Elu", "Fae", "Fio", "Gwe", "Hela",
    "Ili", "Isa", "Jas", "Kae", "Kira", "Lia", "Luna", "Mira", "Nae", "Nora", "Ori", "Phae", "Qira",
    "Rina", "Sera", "Tali", "Una", "Vela", "Wyna", "Xira", "Ys", "Zara",
];

const FEMALE_FIRST_ENDS: &[&str] = &[
    "a", "ae", "ara", "ella", "ena", "enne", "era", "essa", "eth", "ia", "iel", "ielle", "ina", "ira",
    "is", "issa", "ith", "ora", "oria", "riel", "rine", "sha", "sra", "tha", "una", "ya",
];

const LAST_STARTS: &[&str] = &[
    "Amber", "Ash", "Black", "Bright", "Bronze", "Cinder", "Cloud", "Cold", "Dawn", "Deep", "Dragon",
    "Dusk", "Eagle", "Ember", "Even", "Falcon", "Frost", "Glimmer", "Gold", "Gray", "Green", "Grim",
    "High", "Hollow", "Ice", "Iron", "Light", "Long", "Moon", "Night", "Oak", "Quick", "Raven", "Red",
    "River", "Shadow", "Silver", "Sky", "Snow", "Star", "Steel", "Stone", "Storm", "Sun", "Swift",
    "Thorn", "True", "Umber", "Vale", "White", "Wild", "Wind", "Winter", "Wolf", "Wyrm",
];

const LAST_ENDS: &[&str] = &[
    "bane", "barrow", "beck", "blade", "bloom", "born", "branch", "brand", "brook", "crest", "dale",
    "dancer", "fall", "field", "fire", "forge", "gaze", "guard", "hall", "haven", "heart", "helm",
    "keep", "mane", "mark", "mere", "mont", "more", "peak", "rest", "ridge", "run", "runner", "scar",
    "seer", "shield", "song", "spire", "step", "stride", "thorn", "vale", "ward", "watch", "weaver",
    "whisper", "wind", "wing", "wood", "worth",
];

pub const FIRST_NAME_POOL_SIZE: usize = 320;
pub const LAST_NAME_POOL_SIZE: usize = 420;

// ============================================================================
// Pools (Lazy Loaded)
// ============================================================================

static MALE_FIRST_NAMES: OnceLock<Vec<String>> = OnceLock::new();
static FEMALE_FIRST_NAMES: OnceLock<Vec<String>> = OnceLock::new();
static LAST_NAMES: OnceLock<Vec<String>> = OnceLock::new();

/// Pair every start with every end, in order, up to `limit` names.
fn build_names(starts: &[&str], ends: &[&str], limit: usize) -> Vec<String> {
    starts
        .iter()
        .flat_map(|start| ends.iter().map(move |end| format!("{start}{end}")))
        .take(limit)
        .collect()
}

pub fn male_first_names() -> &'static [String] {
    MALE_FIRST_NAMES.get_or_init(|| build_names(MALE_FIRST_STARTS, MALE_FIRST_ENDS, FIRST_NAME_POOL_SIZE))
}

pub fn female_first_names() -> &'static [String] {
    FEMALE_FIRST_NAMES
        .get_or_init(|| build_names(FEMALE_FIRST_STARTS, FEMALE_FIRST_ENDS, FIRST_NAME_POOL_SIZE))
}

pub fn last_names() -> &'static [String] {
    LAST_NAMES.get_or_init(|| build_names(LAST_STARTS, LAST_ENDS, LAST_NAME_POOL_SIZE))
}

/// First-name pool for a gender. `Unknown` has no pool of its own.
pub fn first_names(gender: Gender) -> Option<&'static [String]> {
    match gender {
        Gender::Male => Some(male_first_names()),
        Gender::Female => Some(female_first_names()),
        Gender::Unknown => None,
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Generate "First Last". Without a usable gender, male or female is
/// chosen with equal odds first.
pub fn generate<R: Rng + ?Sized>(gender: Option<Gender>, rng: &mut R) -> String {
    let selected = match gender {
        Some(g @ (Gender::Male | Gender::Female)) => g,
        _ => {
            if rng.gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            }
        }
    };

    let first = first_names(selected)
        .and_then(|pool| pool.choose(rng))
        .map(String::as_str)
        .unwrap_or("Nameless");
    let last = last_names().choose(rng).map(String::as_str).unwrap_or("Wanderer");

    format!("{first} {last}")
}

/// [`generate`] with the thread-local RNG.
pub fn random_character_name(gender: Option<Gender>) -> String {
    generate(gender, &mut thread_rng())
}
