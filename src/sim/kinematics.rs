//! Hunter kinematics
//!
//! Constant-gravity jumps and level-triggered lateral movement. Units are per
//! tick, so nothing here takes a `dt`.

use super::state::HunterState;
use crate::tuning::Tuning;

/// Apply one tick of gravity
///
/// Identity for a hunter standing on the ground.
pub fn advance_vertical(hunter: &mut HunterState, tuning: &Tuning) {
    if !hunter.is_airborne && hunter.height_above_ground <= tuning.ground_level {
        return;
    }

    let velocity = hunter.vertical_velocity - tuning.gravity;
    let height = (hunter.height_above_ground + velocity).max(tuning.ground_level);

    hunter.vertical_velocity = velocity;
    hunter.height_above_ground = height;
    hunter.is_airborne = height > tuning.ground_level || velocity > 0.0;
}

/// Move along the track by one step of lateral speed per held direction
pub fn advance_horizontal(hunter: &mut HunterState, move_left: bool, move_right: bool, tuning: &Tuning) {
    let mut dx = 0.0;
    if move_left {
        dx -= hunter.lateral_speed;
    }
    if move_right {
        dx += hunter.lateral_speed;
    }
    if dx != 0.0 {
        hunter.position_x = (hunter.position_x + dx).clamp(tuning.track_min_x, tuning.track_max_x);
    }
}

/// Launch velocity for the hunter's current build
#[inline]
pub fn jump_velocity(hunter: &HunterState, tuning: &Tuning) -> f32 {
    tuning.base_jump_velocity + hunter.muscle / tuning.muscle_jump_divisor
        - hunter.weight / tuning.weight_jump_divisor
}

/// Start a jump if standing on the ground
///
/// Returns the launch velocity, or `None` while already airborne.
pub fn try_jump(hunter: &mut HunterState, tuning: &Tuning) -> Option<f32> {
    if hunter.is_airborne {
        return None;
    }
    let velocity = jump_velocity(hunter, tuning);
    hunter.vertical_velocity = velocity;
    hunter.is_airborne = true;
    Some(velocity)
}
