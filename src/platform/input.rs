//! Input intents
//!
//! Keyboard and touch both funnel into [`InputState`]. Directions are
//! level-triggered (held = moving every tick); jump, start and restart are
//! one-shot and cleared once a tick has consumed them.

use crate::sim::TickInput;

/// Abstract player intent, independent of device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Left,
    Right,
    Jump,
    Start,
    Restart,
}

impl Intent {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Intent::Left),
            "ArrowRight" | "d" | "D" => Some(Intent::Right),
            " " | "ArrowUp" | "w" | "W" => Some(Intent::Jump),
            "Enter" => Some(Intent::Start),
            "r" | "R" => Some(Intent::Restart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left_held: bool,
    right_held: bool,
    jump_pending: bool,
    start_pending: bool,
    restart_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, intent: Intent) {
        match intent {
            Intent::Left => self.left_held = true,
            Intent::Right => self.right_held = true,
            Intent::Jump => self.jump_pending = true,
            Intent::Start => self.start_pending = true,
            Intent::Restart => self.restart_pending = true,
        }
    }

    /// One-shot intents ignore release
    pub fn release(&mut self, intent: Intent) {
        match intent {
            Intent::Left => self.left_held = false,
            Intent::Right => self.right_held = false,
            Intent::Jump | Intent::Start | Intent::Restart => {}
        }
    }

    /// Returns true if the key was one we handle
    pub fn key_down(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.press(intent);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.release(intent);
                true
            }
            None => false,
        }
    }

    /// Drop everything held (window blur, touch cancel)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Sample for the next tick, clearing one-shot intents
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left_held,
            move_right: self.right_held,
            jump: self.jump_pending,
            start: self.start_pending,
            restart: self.restart_pending,
        };
        self.jump_pending = false;
        self.start_pending = false;
        self.restart_pending = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_direction_repeats() {
        let mut input = InputState::new();
        input.key_down("ArrowRight");
        assert!(input.take_tick_input().move_right);
        assert!(input.take_tick_input().move_right);
        input.key_up("ArrowRight");
        assert!(!input.take_tick_input().move_right);
    }

    #[test]
    fn test_jump_is_one_shot() {
        let mut input = InputState::new();
        assert!(input.key_down(" "));
        assert!(input.take_tick_input().jump);
        assert!(!input.take_tick_input().jump);

        // Releasing before the tick still jumps
        input.key_down("ArrowUp");
        input.key_up("ArrowUp");
        assert!(input.take_tick_input().jump);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("Shift"));
        assert_eq!(input.take_tick_input(), TickInput::default());
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.press(Intent::Left);
        input.press(Intent::Restart);
        input.release_all();
        assert_eq!(input.take_tick_input(), TickInput::default());
    }
}
