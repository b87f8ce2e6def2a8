//! Racial ability bonuses: one +2 and one +1 per race.

use super::{Ability, AbilityScores};

/// A `{+2, +1}` pair. Either slot may be empty when a short priority list
/// supplies the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RacialBonus {
    pub plus_two: Option<Ability>,
    pub plus_one: Option<Ability>,
}

impl RacialBonus {
    const fn fixed(plus_two: Ability, plus_one: Ability) -> Self {
        Self {
            plus_two: Some(plus_two),
            plus_one: Some(plus_one),
        }
    }

    /// Add the bonuses, clamping each score at 20.
    pub fn apply(&self, scores: &mut AbilityScores) {
        if let Some(ability) = self.plus_two {
            scores.add_capped(ability, 2);
        }
        if let Some(ability) = self.plus_one {
            scores.add_capped(ability, 1);
        }
    }
}

/// Fixed racial table. `None` for races not listed.
fn known_race(race: &str) -> Option<RacialBonus> {
    use Ability::*;

    let bonus = match race {
        "dragonborn" => RacialBonus::fixed(Strength, Charisma),
        "dwarf" => RacialBonus::fixed(Constitution, Wisdom),
        "elf" => RacialBonus::fixed(Dexterity, Intelligence),
        "gnome" => RacialBonus::fixed(Intelligence, Constitution),
        "half-elf" => RacialBonus::fixed(Charisma, Dexterity),
        "half-orc" => RacialBonus::fixed(Strength, Constitution),
        "halfling" => RacialBonus::fixed(Dexterity, Charisma),
        "tiefling" => RacialBonus::fixed(Charisma, Intelligence),
        _ => return None,
    };
    Some(bonus)
}

/// Bonus for `race` (trimmed, case-insensitive). Unknown races fall back
/// to the top two entries of `priority`.
pub fn racial_bonus(race: &str, priority: &[Ability]) -> RacialBonus {
    let normalized = race.trim().to_lowercase();
    known_race(&normalized).unwrap_or_else(|| RacialBonus {
        plus_two: priority.first().copied(),
        plus_one: priority.get(1).copied(),
    })
}
