//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (60 ticks per second, units per tick)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod food;
pub mod kinematics;
pub mod obstacle;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{beast_contact, clears_beast, hunter_touches_food, within_box};
pub use obstacle::ObstacleStep;
pub use scoring::{FoodEffect, food_effect};
pub use state::{
    BeastState, FoodItem, FoodKind, GameEvent, GamePhase, GameState, HunterState, RoundState,
    RoundSummary, Snapshot, StatEffect,
};
pub use tick::{TickInput, tick};
