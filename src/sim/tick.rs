//! Fixed timestep simulation tick
//!
//! The only place round state changes during play. One call advances the
//! phase machine by one 60 Hz step; while playing it runs kinematics, the
//! beast, then food, in that order.

use super::collision::beast_contact;
use super::food::step_food;
use super::kinematics::{advance_horizontal, advance_vertical, try_jump};
use super::obstacle;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SIM_HZ;

/// Intents sampled for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held left (level-triggered)
    pub move_left: bool,
    /// Held right (level-triggered)
    pub move_right: bool,
    /// Jump pressed since last tick
    pub jump: bool,
    /// Leave the instructions screen
    pub start: bool,
    /// New round
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if input.restart
        && matches!(
            state.round.phase,
            GamePhase::Countdown | GamePhase::Playing | GamePhase::GameOver
        )
    {
        state.restart();
        return;
    }

    match state.round.phase {
        GamePhase::Instructions => {
            if input.start {
                state.round.phase = GamePhase::Countdown;
                state.round.countdown_remaining = state.tuning.countdown_seconds;
                state.round.countdown_ticks = 0;
                state.events.push(GameEvent::Started);
                log::info!("Countdown started");
            }
        }
        GamePhase::Countdown => step_countdown(state),
        GamePhase::Playing => step_playing(state, input),
        GamePhase::GameOver => {}
    }
}

/// 3, 2, 1 at one-second intervals, then hold "GO" before play
fn step_countdown(state: &mut GameState) {
    let round = &mut state.round;
    round.countdown_ticks += 1;

    if round.countdown_remaining > 0 {
        if round.countdown_ticks >= SIM_HZ {
            round.countdown_ticks = 0;
            round.countdown_remaining -= 1;
            let remaining = round.countdown_remaining;
            state.events.push(if remaining == 0 {
                GameEvent::Go
            } else {
                GameEvent::CountdownTick { remaining }
            });
        }
    } else if round.countdown_ticks >= state.tuning.go_delay_ticks {
        round.countdown_ticks = 0;
        round.phase = GamePhase::Playing;
        log::info!("Round live");
    }
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    state.round.ticks_played += 1;

    // --- Kinematics ---
    advance_horizontal(&mut state.hunter, input.move_left, input.move_right, &state.tuning);
    if input.jump {
        if let Some(velocity) = try_jump(&mut state.hunter, &state.tuning) {
            state.events.push(GameEvent::Jumped { velocity });
        }
    }
    advance_vertical(&mut state.hunter, &state.tuning);

    // --- Beast ---
    let step = obstacle::advance(&mut state.beast, &state.hunter, &state.tuning);
    if step.cleared {
        state.round.score += step.bonus;
        state.round.beasts_cleared += 1;
        state.events.push(GameEvent::BeastCleared { bonus: step.bonus });
    } else if beast_contact(&state.beast, &state.hunter, &state.tuning) {
        state.round.lives = state.round.lives.saturating_sub(1);
        if state.round.lives == 0 {
            state.round.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver {
                final_score: state.round.score,
            });
            log::info!(
                "Game over: score {} after {} ticks",
                state.round.score,
                state.round.ticks_played
            );
            return;
        }
        obstacle::reset(&mut state.beast, &state.tuning);
        state.events.push(GameEvent::LifeLost {
            remaining: state.round.lives,
        });
        log::info!("Hunter caught, {} lives left", state.round.lives);
    }

    // --- Food ---
    step_food(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BeastState, HunterState, RoundState};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.round.phase = GamePhase::Playing;
        state
    }

    fn run_countdown(state: &mut GameState) -> u32 {
        let mut ticks = 0;
        while state.round.phase == GamePhase::Countdown {
            tick(state, &TickInput::default());
            ticks += 1;
            assert!(ticks < 10_000);
        }
        ticks
    }

    #[test]
    fn test_instructions_wait_for_start() {
        let mut state = GameState::new(1);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.round.phase, GamePhase::Instructions);
        assert_eq!(state.beast.position_x, -100.0);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start);
        assert_eq!(state.round.phase, GamePhase::Countdown);
        assert_eq!(state.round.countdown_remaining, 3);
        assert_eq!(state.events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_countdown_takes_four_seconds_without_simulating() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { start: true, ..Default::default() });

        let mut seen = Vec::new();
        let mut ticks = 0;
        while state.round.phase == GamePhase::Countdown {
            let input = TickInput {
                move_right: true,
                jump: true,
                ..Default::default()
            };
            tick(&mut state, &input);
            seen.extend(state.events.iter().cloned());
            ticks += 1;
        }

        // 3 seconds of countdown plus the 1 second GO hold
        assert_eq!(ticks, 4 * SIM_HZ);
        assert_eq!(
            seen,
            vec![
                GameEvent::CountdownTick { remaining: 2 },
                GameEvent::CountdownTick { remaining: 1 },
                GameEvent::Go,
            ]
        );
        assert_eq!(state.hunter, HunterState::new(&state.tuning));
        assert_eq!(state.beast.position_x, -100.0);
        assert!(state.food.is_empty());
    }

    #[test]
    fn test_clear_beats_collision() {
        let mut state = playing(1);
        state.hunter.position_x = 100.0;
        state.hunter.height_above_ground = 80.0;
        state.hunter.is_airborne = true;
        state.hunter.vertical_velocity = 5.0;
        state.beast.position_x = 70.0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.round.score, 50);
        assert_eq!(state.round.lives, 3);
        assert_eq!(state.beast.position_x, -100.0);
        assert_eq!(state.round.beasts_cleared, 1);
        assert!(state.events.contains(&GameEvent::BeastCleared { bonus: 50 }));
    }

    #[test]
    fn test_collision_costs_a_life_and_resets_beast() {
        let mut state = playing(1);
        state.beast.position_x = -3.0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.round.lives, 2);
        assert_eq!(state.round.phase, GamePhase::Playing);
        assert_eq!(state.beast.position_x, -100.0);
        assert!(state.events.contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_last_life_ends_round_without_reset() {
        let mut state = playing(1);
        state.round.lives = 1;
        state.beast.position_x = -3.0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.round.lives, 0);
        assert_eq!(state.round.phase, GamePhase::GameOver);
        assert_eq!(state.beast.position_x, 0.0);
        assert!(state.summary().is_some());

        // Halted
        let frozen = state.snapshot();
        tick(&mut state, &TickInput { move_right: true, jump: true, ..Default::default() });
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn test_standing_still_loses_every_life() {
        let mut state = playing(5);
        let mut lost = 0;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default());
            lost += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::LifeLost { .. } | GameEvent::GameOver { .. }))
                .count();
            if state.round.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(state.round.phase, GamePhase::GameOver);
        assert_eq!(lost, 3);
    }

    #[test]
    fn test_jumping_over_the_beast() {
        let mut state = playing(11);
        state.tuning.food_spawn_chance = 0.0;

        // Beast reaches contact at x >= 0, so launch a few ticks ahead of it
        let mut jumped = false;
        for _ in 0..200 {
            let jump = !jumped && state.beast.position_x >= -25.0;
            jumped |= jump;
            tick(&mut state, &TickInput { jump, ..Default::default() });
            if state.round.beasts_cleared > 0 {
                break;
            }
        }
        assert_eq!(state.round.beasts_cleared, 1);
        assert_eq!(state.round.lives, 3);
        assert_eq!(state.round.score, 50);
    }

    #[test]
    fn test_restart_restores_defaults() {
        let mut state = playing(77);
        for i in 0..300 {
            let input = TickInput {
                move_right: i % 3 == 0,
                jump: i % 40 == 0,
                ..Default::default()
            };
            tick(&mut state, &input);
        }
        state.round.score = 1234;
        crate::sim::food::spawn_food(&mut state);

        tick(&mut state, &TickInput { restart: true, ..Default::default() });

        let tuning = Tuning::default();
        let mut expected_round = RoundState::new(&tuning);
        expected_round.phase = GamePhase::Countdown;
        assert_eq!(state.hunter, HunterState::new(&tuning));
        assert_eq!(state.beast, BeastState::new(&tuning));
        assert_eq!(state.round, expected_round);
        assert!(state.food.is_empty());
        assert_eq!(state.events, vec![GameEvent::Restarted]);

        let ticks = run_countdown(&mut state);
        assert_eq!(ticks, 4 * SIM_HZ);
        assert_eq!(state.round.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_ignored_on_instructions() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { restart: true, ..Default::default() });
        assert_eq!(state.round.phase, GamePhase::Instructions);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        for i in 0..600u32 {
            let input = TickInput {
                move_left: i % 7 < 3,
                move_right: i % 5 == 0,
                jump: i % 50 == 0,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), prop::bool::weighted(0.1)).prop_map(|(l, r, j)| TickInput {
            move_left: l,
            move_right: r,
            jump: j,
            ..Default::default()
        })
    }

    proptest! {
        #[test]
        fn prop_hunter_invariants_hold(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..800),
        ) {
            let tuning = Tuning { food_spawn_chance: 0.2, ..Tuning::default() };
            let mut state = GameState::with_tuning(seed, tuning);
            state.round.phase = GamePhase::Playing;

            for input in &inputs {
                tick(&mut state, input);
                let h = &state.hunter;
                prop_assert!(h.height_above_ground >= 20.0);
                prop_assert!(h.lateral_speed >= 2.0);
                prop_assert!(h.position_x >= 0.0 && h.position_x <= 750.0);
                prop_assert_eq!(
                    h.is_airborne,
                    h.height_above_ground > 20.0 || h.vertical_velocity > 0.0
                );
                prop_assert!(h.weight >= 0.0 && h.muscle >= 0.0);
            }
        }

        #[test]
        fn prop_game_over_iff_out_of_lives(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..1500),
        ) {
            let mut state = playing(seed);
            for input in &inputs {
                tick(&mut state, input);
                prop_assert_eq!(state.round.phase == GamePhase::GameOver, state.round.lives == 0);
            }
        }
    }
}
