//! 27-Point Buy Allocator
//!
//! Spends a fixed budget over six scores in two phases:
//!
//! 1. The top three priorities are pushed toward 15, 14 and 13.
//! 2. The rest of the budget goes one point at a time to a weighted-random
//!    pick among affordable scores, favouring higher priorities.
//!
//! Racial bonuses are applied last and may push a score past 15, never past 20.

use rand::Rng;

use super::racial::racial_bonus;
use super::{Ability, AbilityScores, SCORE_FLOOR};

/// Points available to spend.
pub const POINT_BUY_BUDGET: i32 = 27;

/// Highest score purchasable with points.
pub const POINT_BUY_MAX: i32 = 15;

/// Targets for the first three priority entries.
const PRIORITY_TARGETS: [i32; 3] = [15, 14, 13];

/// Total cost of a score, indexed from [`SCORE_FLOOR`] through [`POINT_BUY_MAX`].
const COST_BY_SCORE: [i32; 8] = [0, 1, 2, 3, 4, 5, 7, 9];

/// Total point cost to reach `score` from the floor, if buyable.
pub fn score_cost(score: i32) -> Option<i32> {
    if !(SCORE_FLOOR..=POINT_BUY_MAX).contains(&score) {
        return None;
    }
    COST_BY_SCORE.get((score - SCORE_FLOOR) as usize).copied()
}

/// Cost of raising a score from `current` to `current + 1`.
fn increment_cost(current: i32) -> Option<i32> {
    Some(score_cost(current + 1)? - score_cost(current)?)
}

/// Allocation state: the scores so far and the unspent budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointBuy {
    pub scores: AbilityScores,
    pub remaining: i32,
}

impl Default for PointBuy {
    fn default() -> Self {
        Self {
            scores: AbilityScores::default(),
            remaining: POINT_BUY_BUDGET,
        }
    }
}

impl PointBuy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points spent so far.
    pub fn spent(&self) -> i32 {
        POINT_BUY_BUDGET - self.remaining
    }

    /// Raise one score by a single point, if the budget allows.
    fn raise(self, ability: Ability) -> Option<Self> {
        let current = self.scores.get(ability);
        let cost = increment_cost(current)?;
        if cost > self.remaining {
            return None;
        }

        let mut next = self;
        *next.scores.get_mut(ability) = current + 1;
        next.remaining -= cost;
        Some(next)
    }

    /// Raise `ability` toward `target`, stopping early when the next point
    /// is unaffordable.
    pub fn raise_toward(self, ability: Ability, target: i32) -> Self {
        let mut state = self;
        while state.scores.get(ability) < target {
            match state.raise(ability) {
                Some(next) => state = next,
                None => break,
            }
        }
        state
    }

    /// Deterministic phase: first three priorities toward 15/14/13.
    pub fn seed_priorities(self, priority: &[Ability]) -> Self {
        priority
            .iter()
            .zip(PRIORITY_TARGETS)
            .fold(self, |state, (&ability, target)| state.raise_toward(ability, target))
    }

    /// Distinct priority entries whose next point is affordable.
    pub fn affordable(&self, priority: &[Ability]) -> Vec<Ability> {
        let mut candidates: Vec<Ability> = Vec::with_capacity(priority.len());
        for &ability in priority {
            if candidates.contains(&ability) {
                continue;
            }
            let current = self.scores.get(ability);
            if current >= POINT_BUY_MAX {
                continue;
            }
            if increment_cost(current).is_some_and(|cost| cost <= self.remaining) {
                candidates.push(ability);
            }
        }
        candidates
    }

    /// One randomized spend. Returns `None` once nothing is affordable.
    pub fn spend_random<R: Rng + ?Sized>(self, priority: &[Ability], rng: &mut R) -> Option<Self> {
        if self.remaining <= 0 {
            return None;
        }
        let candidates = self.affordable(priority);
        let picked = pick_weighted_by_priority(&candidates, priority, rng)?;
        self.raise(picked)
    }

    /// Randomized phase: spend until the budget or the candidates run out.
    pub fn spend_remaining<R: Rng + ?Sized>(self, priority: &[Ability], rng: &mut R) -> Self {
        let mut state = self;
        while let Some(next) = state.spend_random(priority, rng) {
            state = next;
        }
        state
    }
}

/// Weight of a candidate: `max(1, len - index)` in the priority list.
fn priority_weight(ability: Ability, priority: &[Ability]) -> u32 {
    let len = priority.len();
    let index = priority.iter().position(|&a| a == ability).unwrap_or(len);
    len.saturating_sub(index).max(1) as u32
}

/// Weighted pick: roll in `[0, total)` and walk cumulative weights.
fn pick_weighted_by_priority<R: Rng + ?Sized>(
    candidates: &[Ability],
    priority: &[Ability],
    rng: &mut R,
) -> Option<Ability> {
    let weighted: Vec<(Ability, u32)> = candidates
        .iter()
        .map(|&a| (a, priority_weight(a, priority)))
        .collect();
    let total: u32 = weighted.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.gen_range(0..total);
    for &(ability, weight) in &weighted {
        if roll < weight {
            return Some(ability);
        }
        roll -= weight;
    }
    weighted.last().map(|&(ability, _)| ability)
}

/// Run both point-buy phases and apply the racial bonus.
pub fn allocate<R: Rng + ?Sized>(priority: &[Ability], race: &str, rng: &mut R) -> AbilityScores {
    let bought = PointBuy::new()
        .seed_priorities(priority)
        .spend_remaining(priority, rng);

    tracing::debug!(spent = bought.spent(), remaining = bought.remaining, "Point buy complete");

    let mut scores = bought.scores;
    racial_bonus(race, priority).apply(&mut scores);
    scores
}
