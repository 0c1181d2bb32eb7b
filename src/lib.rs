//! Nutrition Hunter - jump the beast, eat well, climb the leaderboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, round state)
//! - `platform`: Input intents and fixed-step timing
//! - `leaderboard`: Top-10 score service, storage and client
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod leaderboard;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{ScoringPolicy, Tuning};

/// Game configuration constants
///
/// Distances are in track units (one unit per CSS pixel in the browser
/// front end), velocities in units per tick.
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Track geometry
    pub const GROUND_LEVEL: f32 = 20.0;
    pub const TRACK_MIN_X: f32 = 0.0;
    pub const TRACK_MAX_X: f32 = 750.0;

    /// Hunter defaults
    pub const HUNTER_START_X: f32 = 50.0;
    pub const HUNTER_START_SPEED: f32 = 5.0;
    /// Lateral speed never drops below this
    pub const MIN_LATERAL_SPEED: f32 = 2.0;
    /// Speed lost whenever a weight pickup lands
    pub const WEIGHT_SPEED_PENALTY: f32 = 2.0;

    /// Jump physics
    pub const GRAVITY: f32 = 0.8;
    pub const BASE_JUMP_VELOCITY: f32 = 15.0;
    /// Each 10 muscle adds 1 to jump velocity
    pub const MUSCLE_JUMP_DIVISOR: f32 = 10.0;
    /// Each 20 weight takes 1 from jump velocity
    pub const WEIGHT_JUMP_DIVISOR: f32 = 20.0;

    /// Beast
    pub const BEAST_SPEED: f32 = 3.0;
    /// Off-screen position the beast returns to after a clear or a hit
    pub const BEAST_RESET_X: f32 = -100.0;
    /// Hunter must be above this height to clear the beast
    pub const CLEAR_HEIGHT: f32 = 70.0;
    pub const CLEAR_RANGE: f32 = 50.0;
    pub const BEAST_CONTACT_RANGE: f32 = 50.0;
    pub const CLEAR_BONUS: i64 = 50;

    /// Food
    pub const FOOD_SPAWN_CHANCE: f64 = 0.02;
    /// Spawn offset above the visible area
    pub const FOOD_SPAWN_Y: f32 = -20.0;
    pub const PICKUP_RANGE: f32 = 50.0;

    /// Round
    pub const STARTING_LIVES: u8 = 3;
    pub const COUNTDOWN_SECONDS: u32 = 3;
    /// "GO" display hold before play starts (1 second)
    pub const GO_DELAY_TICKS: u32 = SIM_HZ;
}
