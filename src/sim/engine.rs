//! Engine facade
//!
//! Owns a `GameState` plus the currently held keys and exposes the
//! lifecycle the presentation layer drives: start, restart, movement
//! intents, wall-clock advancement and event draining.

use super::state::{GameEvent, GamePhase, GameState, MoveDirection};
use super::tick::{TickInput, begin_countdown, tick};
use crate::consts::*;
use crate::settings::Settings;

/// The game simulation with an explicit lifecycle
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    input: TickInput,
    /// Sub-tick remainder carried between `advance` calls (microseconds)
    accumulator_us: u64,
}

impl Engine {
    pub fn new(seed: u64, settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or(seed);
        Self {
            state: GameState::new(seed, settings),
            input: TickInput::default(),
            accumulator_us: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_running(&self) -> bool {
        self.state.phase.is_running()
    }

    /// Begin the first run. Ignored unless the game has not started yet.
    ///
    /// Returns whether the countdown began.
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::NotStarted {
            log::debug!("start() ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.accumulator_us = 0;
        begin_countdown(&mut self.state);
        true
    }

    /// Start a fresh run after a game over. Ignored in every other phase.
    ///
    /// Returns whether the countdown began.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            log::debug!("restart() ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.input = TickInput::default();
        self.accumulator_us = 0;
        self.state.reset_run();
        begin_countdown(&mut self.state);
        true
    }

    /// Press or release a movement key
    pub fn set_move_intent(&mut self, direction: MoveDirection, active: bool) {
        match direction {
            MoveDirection::Left => self.input.move_left = active,
            MoveDirection::Right => self.input.move_right = active,
        }
    }

    /// Run exactly one base tick
    pub fn tick(&mut self) {
        tick(&mut self.state, &self.input);
    }

    /// Advance by wall-clock milliseconds; returns the ticks simulated.
    ///
    /// At most `MAX_TICKS_PER_ADVANCE` ticks run per call; any excess time is
    /// dropped rather than replayed.
    pub fn advance(&mut self, elapsed_ms: f64) -> u64 {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }
        // Anything past the cap is dropped below, so clamp before converting
        let max_us = ((MAX_TICKS_PER_ADVANCE + 1) * SIM_TICK_US) as f64;
        let elapsed_us = (elapsed_ms * 1_000.0).min(max_us) as u64;
        self.accumulator_us = self.accumulator_us.saturating_add(elapsed_us);
        let mut ticks = self.accumulator_us / SIM_TICK_US;
        if ticks > MAX_TICKS_PER_ADVANCE {
            log::debug!("Dropping {} ms of backlog", ticks - MAX_TICKS_PER_ADVANCE);
            ticks = MAX_TICKS_PER_ADVANCE;
            self.accumulator_us = 0;
        } else {
            self.accumulator_us %= SIM_TICK_US;
        }
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Take every event emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}
