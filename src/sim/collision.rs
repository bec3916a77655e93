//! Axis-aligned collision detection
//!
//! Everything on the playfield is a box: the player sprite sits on the bottom
//! edge and falling objects are squares. Screen coordinates, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{FallingObject, Player};
use crate::percent_to_px;
use crate::settings::Settings;

/// Axis-aligned bounding box in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(left + width, top + height),
        }
    }

    /// Build from explicit edges: `[left, right] x [top, bottom]`
    pub fn from_edges(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap test; touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The player's hitbox: left edge at its percent position, resting on the floor
pub fn player_rect(player: &Player, settings: &Settings) -> Rect {
    Rect::new(
        percent_to_px(player.position, settings.playfield_width),
        settings.playfield_height - settings.player_height,
        settings.player_width,
        settings.player_height,
    )
}

/// A falling object's hitbox at its current size
pub fn object_rect(object: &FallingObject, settings: &Settings) -> Rect {
    Rect::new(
        percent_to_px(object.x, settings.playfield_width),
        object.y,
        object.size,
        object.size,
    )
}

/// Check whether a falling object hits the player this tick
pub fn object_hits_player(object: &FallingObject, player: &Player, settings: &Settings) -> bool {
    player_rect(player, settings).overlaps(&object_rect(object, settings))
}
