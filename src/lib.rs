//! Skyfall Dodge - A falling-object dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, difficulty, spawning, collisions)
//! - `animation`: Player sprite frame selection
//! - `platform`: Browser input mapping
//! - `renderer`: DOM renderer driven by simulation events (web only)
//! - `audio`: Music and procedural sound cues (web only)
//! - `settings`: Playfield and audio configuration

pub mod animation;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{Engine, GameEvent, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Base simulation tick (1 ms of simulated time)
    pub const SIM_TICK_US: u64 = 1_000;
    /// Maximum base ticks processed by one `Engine::advance` call
    pub const MAX_TICKS_PER_ADVANCE: u64 = 250;

    /// Countdown before a run starts (3, 2, 1)
    pub const COUNTDOWN_FROM: u8 = 3;
    pub const COUNTDOWN_PERIOD_US: u64 = 1_000_000;

    /// Scoring heartbeat
    pub const SCORE_PERIOD_US: u64 = 1_000_000;
    pub const SCORE_PER_SECOND: u64 = 10;

    /// Player motion (60 Hz, percent of playfield width per step)
    pub const PLAYER_MOVE_PERIOD_US: u64 = 16_667;
    pub const PLAYER_STEP: f32 = 0.5;
    pub const PLAYER_START_POSITION: f32 = 50.0;

    /// Difficulty curve
    pub const BASE_SPAWN_INTERVAL_MS: u64 = 1_000;
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 200;
    pub const SCORE_SPEED_DIVISOR: f32 = 1_000.0;
    pub const BASE_FALL_SPEED: f32 = 2.0;

    /// Falling objects
    pub const FALL_PERIOD_US: u64 = 20_000;
    pub const FALL_STEP: f32 = 1.5;
    pub const SPAWN_OFFSET_Y: f32 = -50.0;
    pub const BASE_OBJECT_SIZE: f32 = 50.0;
    pub const OBJECT_SIZE_VARIATION: f32 = 30.0;
    pub const OBJECT_VARIANTS: u8 = 3;

    /// Cosmetic growth near the bottom edge
    pub const GROWTH_ZONE: f32 = 100.0;
    pub const GROWTH_CHANCE: f64 = 0.3;
    pub const GROWTH_STEPS: u8 = 3;
    pub const GROWTH_FACTOR: f32 = 1.02;
    pub const GROWTH_PERIOD_US: u64 = 30_000;
}

/// Clamp a horizontal position to the playfield percent range [0, 100].
///
/// NaN (only reachable through a bug upstream) collapses to the left edge.
#[inline]
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Convert a percent-of-width position to pixels
#[inline]
pub fn percent_to_px(percent: f32, width: f32) -> f32 {
    percent / 100.0 * width
}
