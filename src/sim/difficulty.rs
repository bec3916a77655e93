//! Difficulty curve
//!
//! Pure functions of the current score. Nothing here holds state; the tick
//! re-evaluates the curve whenever the score changes or the spawner fires.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Delay before the next spawn, in milliseconds
#[inline]
pub fn spawn_interval_ms(score: u64) -> u64 {
    BASE_SPAWN_INTERVAL_MS
        .saturating_sub(score)
        .max(MIN_SPAWN_INTERVAL_MS)
}

/// Fall speed scale applied to every object step
#[inline]
pub fn speed_multiplier(score: u64) -> f32 {
    1.0 + score as f32 / SCORE_SPEED_DIVISOR
}

/// Base fall speed. Informational: object motion scales `FALL_STEP` by
/// `speed_multiplier` instead.
#[inline]
pub fn fall_speed_base(score: u64) -> f32 {
    BASE_FALL_SPEED + score as f32 / SCORE_SPEED_DIVISOR
}

/// Snapshot of the difficulty curve at a given score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub spawn_interval_ms: u64,
    pub speed_multiplier: f32,
    pub fall_speed_base: f32,
}

impl Difficulty {
    pub fn for_score(score: u64) -> Self {
        Self {
            spawn_interval_ms: spawn_interval_ms(score),
            speed_multiplier: speed_multiplier(score),
            fall_speed_base: fall_speed_base(score),
        }
    }

    /// Distance an object falls per 20 ms fall step at this difficulty
    pub fn fall_step(&self) -> f32 {
        FALL_STEP * self.speed_multiplier
    }
}
