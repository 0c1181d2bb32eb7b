//! Fixed-step accumulator
//!
//! The single tick source for the game. Frames of any length turn into a
//! whole number of 60 Hz simulation steps.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame we try to catch up on (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed elapsed seconds, get the number of ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Feed an absolute timestamp (e.g. from requestAnimationFrame)
    pub fn advance_to(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        self.advance(dt)
    }

    /// Forget pending time (after a restart or a hidden tab)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_is_sixty_ticks() {
        let mut step = FixedStep::new();
        let mut total = 0;
        for _ in 0..100 {
            total += step.advance(0.01);
        }
        assert!((59..=60).contains(&total), "got {}", total);
    }

    #[test]
    fn test_long_frame_is_bounded() {
        let mut step = FixedStep::new();
        assert!((5..=6).contains(&step.advance(5.0)));
        assert!(step.advance(0.0) <= 1);
    }

    #[test]
    fn test_timestamps() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance_to(1000.0), 0);
        assert_eq!(step.advance_to(1060.0), 3);
        step.reset();
        assert_eq!(step.advance_to(9000.0), 0);
    }
}
