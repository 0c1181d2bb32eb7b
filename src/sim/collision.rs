//! Axis-aligned proximity tests
//!
//! Both axes are thresholded independently (a box, not a circle), which is
//! what makes the hunter feel generous when grabbing food.

use glam::Vec2;

use super::state::{BeastState, FoodItem, HunterState};
use crate::tuning::Tuning;

/// True when `a` and `b` are strictly closer than `range` on both axes
#[inline]
pub fn within_box(a: Vec2, b: Vec2, range: f32) -> bool {
    (a - b).abs().cmplt(Vec2::splat(range)).all()
}

/// Hunter touches a food item
#[inline]
pub fn hunter_touches_food(hunter: &HunterState, food: &FoodItem, tuning: &Tuning) -> bool {
    within_box(hunter.pos(), food.pos, tuning.pickup_range)
}

/// Hunter is high enough and close enough to sail over a beast at `beast_x`
#[inline]
pub fn clears_beast(hunter: &HunterState, beast_x: f32, tuning: &Tuning) -> bool {
    hunter.height_above_ground > tuning.clear_height
        && (hunter.position_x - beast_x).abs() < tuning.clear_range
}

/// Beast has reached a hunter that is too low to avoid it
#[inline]
pub fn beast_contact(beast: &BeastState, hunter: &HunterState, tuning: &Tuning) -> bool {
    beast.position_x >= hunter.position_x - tuning.contact_range
        && hunter.height_above_ground <= tuning.clear_height
}
