//! Food spawning and pickup
//!
//! Items appear at random along the track and stay until the hunter touches
//! them. Nothing despawns on its own; `Tuning::max_live_food` is the only
//! bound on the live set.

use glam::Vec2;
use rand::Rng;

use super::collision::hunter_touches_food;
use super::scoring::{FoodEffect, consume, food_effect};
use super::state::{FoodItem, FoodKind, GameEvent, GameState};

/// Spawn one item of a random kind at a random track position
pub fn spawn_food(state: &mut GameState) {
    if let Some(cap) = state.tuning.max_live_food {
        if state.food.len() >= cap {
            return;
        }
    }

    let kind = FoodKind::ALL[state.rng.random_range(0..FoodKind::ALL.len())];
    let x = state
        .rng
        .random_range(state.tuning.track_min_x..state.tuning.track_max_x);
    let effect = food_effect(state.tuning.policy, kind);

    let item = FoodItem {
        id: state.next_entity_id(),
        kind,
        score_delta: effect.score_delta,
        stat_effect: effect.stat,
        stat_magnitude: effect.magnitude,
        pos: Vec2::new(x, state.tuning.food_spawn_y),
    };
    log::debug!("Spawned {} at x={:.0}", kind.as_str(), x);
    state.food.push(item);
}

/// Roll the per-tick spawn chance
pub fn maybe_spawn(state: &mut GameState) {
    if state.rng.random_bool(state.tuning.food_spawn_chance) {
        spawn_food(state);
    }
}

/// Eat every item the hunter is touching
///
/// Returns the number of items collected.
pub fn collect_food(state: &mut GameState) -> usize {
    let (eaten, kept): (Vec<FoodItem>, Vec<FoodItem>) = std::mem::take(&mut state.food)
        .into_iter()
        .partition(|food| hunter_touches_food(&state.hunter, food, &state.tuning));
    state.food = kept;

    for food in &eaten {
        // Scored with the row stamped at spawn time
        let effect = FoodEffect {
            score_delta: food.score_delta,
            stat: food.stat_effect,
            magnitude: food.stat_magnitude,
        };
        consume(&mut state.hunter, &mut state.round, food.kind, effect, &state.tuning);
        state.events.push(GameEvent::FoodCollected {
            kind: food.kind,
            score_delta: food.score_delta,
        });
    }

    if state.tuning.replace_collected {
        for _ in 0..eaten.len() {
            spawn_food(state);
        }
    }

    eaten.len()
}

/// The food phase of a playing tick
pub fn step_food(state: &mut GameState) {
    collect_food(state);
    maybe_spawn(state);
}
