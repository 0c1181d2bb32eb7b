//! Platform abstraction layer
//!
//! Handles the browser/native edges of the simulation:
//! - Input events reduced to per-tick intents
//! - Frame time converted to whole fixed ticks
//! - Food element bookkeeping for the DOM

pub mod input;
pub mod sprites;
pub mod time;

pub use input::{InputState, Intent};
pub use sprites::{SpriteDiff, diff_ids, food_element_id};
pub use time::FixedStep;
