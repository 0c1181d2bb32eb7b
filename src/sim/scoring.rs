//! Food scoring tables and stat feedback
//!
//! Weight gain always costs lateral speed as well; that coupling is what
//! makes junk food hurt twice (slower runs, lower jumps).

use super::state::{FoodKind, HunterState, RoundState, StatEffect};
use crate::tuning::{ScoringPolicy, Tuning};

/// One row of a scoring table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodEffect {
    pub score_delta: i64,
    pub stat: StatEffect,
    pub magnitude: f32,
}

const fn row(score_delta: i64, stat: StatEffect, magnitude: f32) -> FoodEffect {
    FoodEffect {
        score_delta,
        stat,
        magnitude,
    }
}

/// Look up what eating `kind` does under `policy`
pub fn food_effect(policy: ScoringPolicy, kind: FoodKind) -> FoodEffect {
    use FoodKind::*;
    use StatEffect::*;

    match policy {
        ScoringPolicy::Canonical => match kind {
            Protein => row(10, Muscle, 1.0),
            Carb => row(-5, Weight, 1.0),
            Fat => row(0, Speed, 1.0),
            Sugar => row(-8, Weight, 1.0),
        },
        ScoringPolicy::Legacy => match kind {
            Protein => row(20, Muscle, 5.0),
            Carb => row(15, Speed, 2.0),
            Fat => row(10, Weight, 5.0),
            Sugar => row(5, Weight, 10.0),
        },
    }
}

/// Apply a stat change to the hunter
pub fn apply_stat(hunter: &mut HunterState, stat: StatEffect, magnitude: f32, tuning: &Tuning) {
    match stat {
        StatEffect::Muscle => hunter.muscle += magnitude,
        StatEffect::Speed => hunter.lateral_speed += magnitude,
        StatEffect::Weight => {
            hunter.weight += magnitude;
            hunter.lateral_speed =
                (hunter.lateral_speed - tuning.weight_speed_penalty).max(tuning.min_lateral_speed);
        }
    }
}

/// Eat one item: stats, score and the per-category tally
pub fn consume(
    hunter: &mut HunterState,
    round: &mut RoundState,
    kind: FoodKind,
    effect: FoodEffect,
    tuning: &Tuning,
) {
    apply_stat(hunter, effect.stat, effect.magnitude, tuning);
    round.score += effect.score_delta;
    *round.categories_consumed.entry(kind).or_insert(0) += 1;
}
