//! Beast movement
//!
//! The beast walks right at a constant speed. Clearing it is checked against
//! the position it is about to move to, before any contact check.

use super::collision::clears_beast;
use super::state::{BeastState, HunterState};
use crate::tuning::Tuning;

/// Outcome of one beast step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObstacleStep {
    /// Score awarded this step (0 unless cleared)
    pub bonus: i64,
    pub cleared: bool,
}

/// Advance the beast one tick
pub fn advance(beast: &mut BeastState, hunter: &HunterState, tuning: &Tuning) -> ObstacleStep {
    let candidate_x = beast.position_x + beast.speed;

    if clears_beast(hunter, candidate_x, tuning) {
        reset(beast, tuning);
        return ObstacleStep {
            bonus: tuning.clear_bonus,
            cleared: true,
        };
    }

    beast.position_x = candidate_x;
    ObstacleStep::default()
}

/// Send the beast back off-screen
#[inline]
pub fn reset(beast: &mut BeastState, tuning: &Tuning) {
    beast.position_x = tuning.beast_reset_x;
}
