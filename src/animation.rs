//! Player sprite animation
//!
//! The player alternates between two frames: slowly while idle, faster while
//! walking. The simulation only reports the animation state; frame timing is
//! purely presentational and runs on wall-clock time.

use crate::sim::PlayerAnimation;

/// Idle frames swap every 300 ms
pub const IDLE_FRAME_MS: f64 = 300.0;
/// Walk frames swap every 200 ms
pub const WALK_FRAME_MS: f64 = 200.0;

/// Tracks the current sprite frame for the player
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimator {
    state: PlayerAnimation,
    /// Time spent on the current frame
    elapsed_ms: f64,
    /// false = first frame, true = second frame
    alternate: bool,
}

impl Default for SpriteAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteAnimator {
    pub fn new() -> Self {
        Self {
            state: PlayerAnimation::Idle,
            elapsed_ms: 0.0,
            alternate: false,
        }
    }

    pub fn state(&self) -> PlayerAnimation {
        self.state
    }

    /// Switch animation; restarts the cycle on the first frame
    pub fn set_state(&mut self, state: PlayerAnimation) {
        if state != self.state {
            self.state = state;
            self.elapsed_ms = 0.0;
            self.alternate = false;
        }
    }

    fn frame_ms(&self) -> f64 {
        match self.state {
            PlayerAnimation::Idle => IDLE_FRAME_MS,
            PlayerAnimation::WalkLeft | PlayerAnimation::WalkRight => WALK_FRAME_MS,
        }
    }

    /// Advance wall-clock time. Returns true if the frame changed.
    pub fn update(&mut self, dt_ms: f64) -> bool {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return false;
        }
        self.elapsed_ms += dt_ms;
        let frame_ms = self.frame_ms();
        let mut changed = false;
        while self.elapsed_ms >= frame_ms {
            self.elapsed_ms -= frame_ms;
            self.alternate = !self.alternate;
            changed = !changed;
        }
        changed
    }

    /// Sprite image path for the current frame
    pub fn sprite(&self) -> &'static str {
        match (self.state, self.alternate) {
            (PlayerAnimation::Idle, false) => "players/idle.png",
            (PlayerAnimation::Idle, true) => "players/idle2.png",
            (PlayerAnimation::WalkLeft, false) => "players/walkleft1.png",
            (PlayerAnimation::WalkLeft, true) => "players/walkleft2.png",
            (PlayerAnimation::WalkRight, false) => "players/walkright1.png",
            (PlayerAnimation::WalkRight, true) => "players/walkright2.png",
        }
    }
}

/// Sprite image path for a falling object variant
pub fn object_sprite(variant: u8) -> String {
    format!("objects/object{}.png", variant)
}
