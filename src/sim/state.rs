//! Game state and core simulation types
//!
//! One [`GameState`] owns everything a round touches. Restart throws it all
//! away and rebuilds from the tuning.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{ScoringPolicy, Tuning};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Controls shown, waiting for start
    Instructions,
    /// 3-2-1-GO before play
    Countdown,
    /// Active gameplay
    Playing,
    /// Lives exhausted
    GameOver,
}

/// Food categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Protein,
    Carb,
    Fat,
    Sugar,
}

impl FoodKind {
    pub const ALL: [FoodKind; 4] = [
        FoodKind::Protein,
        FoodKind::Carb,
        FoodKind::Fat,
        FoodKind::Sugar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Protein => "protein",
            FoodKind::Carb => "carb",
            FoodKind::Fat => "fat",
            FoodKind::Sugar => "sugar",
        }
    }
}

/// Which hunter stat a food item changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatEffect {
    Muscle,
    Speed,
    Weight,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HunterState {
    pub position_x: f32,
    pub height_above_ground: f32,
    pub lateral_speed: f32,
    pub weight: f32,
    pub muscle: f32,
    pub is_airborne: bool,
    pub vertical_velocity: f32,
}

impl HunterState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position_x: tuning.hunter_start_x,
            height_above_ground: tuning.ground_level,
            lateral_speed: tuning.hunter_start_speed,
            weight: 0.0,
            muscle: 0.0,
            is_airborne: false,
            vertical_velocity: 0.0,
        }
    }

    /// Position as (track x, height)
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.position_x, self.height_above_ground)
    }

    /// Sprite scale: muscle bulks the hunter up, weight squashes it
    pub fn display_scale(&self) -> f32 {
        1.0 + self.muscle / 100.0 - self.weight / 200.0
    }
}

/// A collectible food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u32,
    pub kind: FoodKind,
    pub score_delta: i64,
    pub stat_effect: StatEffect,
    pub stat_magnitude: f32,
    /// x along the track, y as vertical offset
    pub pos: Vec2,
}

/// The obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeastState {
    pub position_x: f32,
    /// Constant for the round
    pub speed: f32,
}

impl BeastState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position_x: tuning.beast_reset_x,
            speed: tuning.beast_speed,
        }
    }
}

/// Score, lives and phase for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Signed; bad food can push it below zero
    pub score: i64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Whole seconds left on the countdown
    pub countdown_remaining: u32,
    /// Ticks elapsed in the current countdown second (or the GO hold)
    pub countdown_ticks: u32,
    pub categories_consumed: BTreeMap<FoodKind, u32>,
    pub beasts_cleared: u32,
    pub ticks_played: u64,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            phase: GamePhase::Instructions,
            countdown_remaining: tuning.countdown_seconds,
            countdown_ticks: 0,
            categories_consumed: BTreeMap::new(),
            beasts_cleared: 0,
            ticks_played: 0,
        }
    }
}

/// Things that happened during a tick, for HUD and leaderboard hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    CountdownTick { remaining: u32 },
    Go,
    Jumped { velocity: f32 },
    FoodCollected { kind: FoodKind, score_delta: i64 },
    BeastCleared { bonus: i64 },
    LifeLost { remaining: u8 },
    GameOver { final_score: i64 },
}

/// Read-only view handed to the DOM front end each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub hunter: HunterState,
    pub beast: BeastState,
    pub food: Vec<FoodItem>,
    pub round: RoundState,
}

/// End-of-round stats for the game-over screen and leaderboard submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub final_score: i64,
    pub categories_consumed: BTreeMap<FoodKind, u32>,
    pub beasts_cleared: u32,
    pub ticks_played: u64,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub hunter: HunterState,
    pub beast: BeastState,
    /// Live food (sorted by id for determinism)
    pub food: Vec<FoodItem>,
    pub round: RoundState,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            hunter: HunterState::new(&tuning),
            beast: BeastState::new(&tuning),
            food: Vec::new(),
            round: RoundState::new(&tuning),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Discard the round and go straight to the countdown
    ///
    /// The RNG keeps running so consecutive rounds see different food.
    pub fn restart(&mut self) {
        self.hunter = HunterState::new(&self.tuning);
        self.beast = BeastState::new(&self.tuning);
        self.food.clear();
        self.round = RoundState::new(&self.tuning);
        self.round.phase = GamePhase::Countdown;
        self.next_id = 1;
        self.events.push(GameEvent::Restarted);
        log::info!("Round restarted");
    }

    /// Switch scoring tables before a round starts
    ///
    /// Returns false (and changes nothing) once the player has left the
    /// instructions screen, so one round never mixes tables.
    pub fn set_scoring_policy(&mut self, policy: ScoringPolicy) -> bool {
        if self.round.phase != GamePhase::Instructions {
            return false;
        }
        if self.tuning.policy != policy {
            log::info!("Scoring policy set to {}", policy.as_str());
            self.tuning.policy = policy;
        }
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hunter: self.hunter.clone(),
            beast: self.beast.clone(),
            food: self.food.clone(),
            round: self.round.clone(),
        }
    }

    /// Only available once the round is over
    pub fn summary(&self) -> Option<RoundSummary> {
        (self.round.phase == GamePhase::GameOver).then(|| RoundSummary {
            final_score: self.round.score,
            categories_consumed: self.round.categories_consumed.clone(),
            beasts_cleared: self.round.beasts_cleared,
            ticks_played: self.round.ticks_played,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.hunter.position_x, 50.0);
        assert_eq!(state.hunter.height_above_ground, 20.0);
        assert_eq!(state.hunter.lateral_speed, 5.0);
        assert_eq!(state.hunter.weight, 0.0);
        assert_eq!(state.hunter.muscle, 0.0);
        assert!(!state.hunter.is_airborne);
        assert_eq!(state.beast.position_x, -100.0);
        assert_eq!(state.beast.speed, 3.0);
        assert_eq!(state.round.lives, 3);
        assert_eq!(state.round.score, 0);
        assert_eq!(state.round.phase, GamePhase::Instructions);
        assert!(state.food.is_empty());
    }

    #[test]
    fn test_summary_only_after_game_over() {
        let mut state = GameState::new(1);
        assert!(state.summary().is_none());

        state.round.phase = GamePhase::GameOver;
        state.round.score = -13;
        state.round.categories_consumed.insert(FoodKind::Sugar, 2);
        let summary = state.summary().unwrap();
        assert_eq!(summary.final_score, -13);
        assert_eq!(summary.categories_consumed.get(&FoodKind::Sugar), Some(&2));
    }

    #[test]
    fn test_display_scale() {
        let mut hunter = HunterState::new(&Tuning::default());
        assert_eq!(hunter.display_scale(), 1.0);
        hunter.muscle = 10.0;
        hunter.weight = 20.0;
        assert!((hunter.display_scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_serializes_kinds_lowercase() {
        let mut state = GameState::new(1);
        state.round.categories_consumed.insert(FoodKind::Protein, 1);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"protein\":1"));
    }

    #[test]
    fn test_scoring_policy_only_changes_before_a_round() {
        let mut state = GameState::new(3);
        assert!(state.set_scoring_policy(ScoringPolicy::Legacy));
        crate::sim::food::spawn_food(&mut state);
        let legacy = crate::sim::food_effect(ScoringPolicy::Legacy, state.food[0].kind);
        assert_eq!(state.food[0].score_delta, legacy.score_delta);

        state.round.phase = GamePhase::Playing;
        assert!(!state.set_scoring_policy(ScoringPolicy::Canonical));
        assert_eq!(state.tuning.policy, ScoringPolicy::Legacy);

        // Restart keeps the table chosen on the instructions screen
        state.restart();
        assert_eq!(state.tuning.policy, ScoringPolicy::Legacy);
    }
}
