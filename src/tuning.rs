//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a round can be replayed
//! or rebalanced from a JSON blob without touching code. Missing fields fall
//! back to the defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which food scoring table is active
///
/// `Canonical` is the current balance. `Legacy` is the older
/// "points/effect/value" table, kept selectable for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoringPolicy {
    #[default]
    Canonical,
    Legacy,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Canonical => "Canonical",
            ScoringPolicy::Legacy => "Legacy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "canonical" | "default" => Some(ScoringPolicy::Canonical),
            "legacy" => Some(ScoringPolicy::Legacy),
            _ => None,
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub base_jump_velocity: f32,
    pub muscle_jump_divisor: f32,
    pub weight_jump_divisor: f32,

    // === Track ===
    pub ground_level: f32,
    pub track_min_x: f32,
    pub track_max_x: f32,

    // === Hunter ===
    pub hunter_start_x: f32,
    pub hunter_start_speed: f32,
    pub min_lateral_speed: f32,
    pub weight_speed_penalty: f32,

    // === Beast ===
    pub beast_speed: f32,
    pub beast_reset_x: f32,
    pub clear_height: f32,
    pub clear_range: f32,
    pub contact_range: f32,
    pub clear_bonus: i64,

    // === Food ===
    pub food_spawn_chance: f64,
    pub food_spawn_y: f32,
    pub pickup_range: f32,
    pub policy: ScoringPolicy,
    /// Spawn a replacement whenever an item is collected
    pub replace_collected: bool,
    /// Suppress spawning while this many items are live (None = unbounded)
    pub max_live_food: Option<usize>,

    // === Round ===
    pub starting_lives: u8,
    pub countdown_seconds: u32,
    pub go_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            base_jump_velocity: BASE_JUMP_VELOCITY,
            muscle_jump_divisor: MUSCLE_JUMP_DIVISOR,
            weight_jump_divisor: WEIGHT_JUMP_DIVISOR,

            ground_level: GROUND_LEVEL,
            track_min_x: TRACK_MIN_X,
            track_max_x: TRACK_MAX_X,

            hunter_start_x: HUNTER_START_X,
            hunter_start_speed: HUNTER_START_SPEED,
            min_lateral_speed: MIN_LATERAL_SPEED,
            weight_speed_penalty: WEIGHT_SPEED_PENALTY,

            beast_speed: BEAST_SPEED,
            beast_reset_x: BEAST_RESET_X,
            clear_height: CLEAR_HEIGHT,
            clear_range: CLEAR_RANGE,
            contact_range: BEAST_CONTACT_RANGE,
            clear_bonus: CLEAR_BONUS,

            food_spawn_chance: FOOD_SPAWN_CHANCE,
            food_spawn_y: FOOD_SPAWN_Y,
            pickup_range: PICKUP_RANGE,
            policy: ScoringPolicy::Canonical,
            replace_collected: false,
            max_live_food: None,

            starting_lives: STARTING_LIVES,
            countdown_seconds: COUNTDOWN_SECONDS,
            go_delay_ticks: GO_DELAY_TICKS,
        }
    }
}

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON did not parse
    Parse(String),
    /// A field is outside its allowed range
    OutOfRange { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "invalid tuning JSON: {}", msg),
            TuningError::OutOfRange { field, reason } => {
                write!(f, "tuning field `{}` {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Tuning with a different scoring table
    pub fn with_policy(self, policy: ScoringPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Parse and validate a tuning blob
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} policy)", tuning.policy.as_str());
        Ok(tuning)
    }

    /// Check the values the simulation relies on to stay total
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, reason })
            }
        }

        let finite = [
            self.gravity,
            self.base_jump_velocity,
            self.ground_level,
            self.track_min_x,
            self.track_max_x,
            self.hunter_start_x,
            self.hunter_start_speed,
            self.beast_speed,
            self.beast_reset_x,
            self.food_spawn_y,
        ];
        check(finite.iter().all(|v| v.is_finite()), "*", "must be finite")?;
        check(self.gravity > 0.0, "gravity", "must be positive")?;
        check(self.muscle_jump_divisor > 0.0, "muscle_jump_divisor", "must be positive")?;
        check(self.weight_jump_divisor > 0.0, "weight_jump_divisor", "must be positive")?;
        check(self.track_min_x < self.track_max_x, "track_max_x", "must exceed track_min_x")?;
        check(self.min_lateral_speed > 0.0, "min_lateral_speed", "must be positive")?;
        check(
            self.hunter_start_speed >= self.min_lateral_speed,
            "hunter_start_speed",
            "must be at least min_lateral_speed",
        )?;
        check(self.beast_speed > 0.0, "beast_speed", "must be positive")?;
        check(
            (0.0..=1.0).contains(&self.food_spawn_chance),
            "food_spawn_chance",
            "must be within 0..=1",
        )?;
        check(self.starting_lives > 0, "starting_lives", "must be at least 1")?;
        Ok(())
    }
}
