//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod engine;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Rect, object_hits_player, object_rect, player_rect};
pub use difficulty::{Difficulty, fall_speed_base, spawn_interval_ms, speed_multiplier};
pub use engine::Engine;
pub use spawner::{SizeTier, roll_object, roll_size};
pub use state::{
    FallingObject, GameEvent, GamePhase, GameState, MoveDirection, Player, PlayerAnimation,
    RemovalReason,
};
pub use tick::{TickInput, begin_countdown, tick};
pub use timer::Timer;
