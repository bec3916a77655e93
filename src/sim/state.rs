//! Game state and core simulation types
//!
//! All state the simulation mutates lives here, including its timers and RNG,
//! so tearing a run down is just a matter of resetting this struct.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::speed_multiplier;
use super::timer::Timer;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing scheduled
    NotStarted,
    /// Counting down before the run; `remaining` is the next number shown
    Countdown { remaining: u8 },
    /// Active gameplay
    Running,
    /// Run ended by a collision
    GameOver,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    Right,
}

/// Player sprite animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAnimation {
    #[default]
    Idle,
    WalkLeft,
    WalkRight,
}

/// The player sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Left edge, percent of playfield width in [0, 100]
    pub position: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub animation: PlayerAnimation,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: PLAYER_START_POSITION,
            moving_left: false,
            moving_right: false,
            animation: PlayerAnimation::Idle,
        }
    }

    /// Apply one 60 Hz motion step. Returns true if the position changed.
    pub fn step(&mut self) -> bool {
        let before = self.position;
        if self.moving_left {
            self.position = (self.position - PLAYER_STEP).max(0.0);
        }
        if self.moving_right {
            self.position = (self.position + PLAYER_STEP).min(100.0);
        }
        self.position = crate::clamp_percent(self.position);
        self.position != before
    }

    /// Update held directions; returns the new animation if it changed.
    ///
    /// A newly pressed direction takes over the walk animation, releasing one
    /// falls back to the other held direction, and releasing both idles.
    pub fn set_intent(&mut self, left: bool, right: bool) -> Option<PlayerAnimation> {
        let animation = match (left, right) {
            (false, false) => PlayerAnimation::Idle,
            (true, false) => PlayerAnimation::WalkLeft,
            (false, true) => PlayerAnimation::WalkRight,
            (true, true) if !self.moving_left => PlayerAnimation::WalkLeft,
            (true, true) if !self.moving_right => PlayerAnimation::WalkRight,
            (true, true) => self.animation,
        };
        self.moving_left = left;
        self.moving_right = right;
        if animation != self.animation {
            self.animation = animation;
            Some(animation)
        } else {
            None
        }
    }
}

/// Cosmetic growth in progress near the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub steps_left: u8,
    pub timer: Timer,
}

impl Growth {
    pub fn start(now_us: u64) -> Self {
        let mut timer = Timer::disarmed(GROWTH_PERIOD_US);
        timer.arm(now_us);
        Self {
            steps_left: GROWTH_STEPS,
            timer,
        }
    }
}

/// A falling object entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// Left edge, percent of playfield width in [0, 100]
    pub x: f32,
    /// Top edge in pixels, starts above the playfield
    pub y: f32,
    /// Side length in pixels
    pub size: f32,
    /// Sprite variant (1..=OBJECT_VARIANTS), cosmetic only
    pub variant: u8,
    /// Run tick at which the object spawned
    pub spawn_tick: u64,
    #[serde(default)]
    pub growth: Option<Growth>,
}

impl FallingObject {
    pub fn new(id: u32, x: f32, size: f32, variant: u8, spawn_tick: u64) -> Self {
        Self {
            id,
            x: crate::clamp_percent(x),
            y: SPAWN_OFFSET_Y,
            size,
            variant,
            spawn_tick,
            growth: None,
        }
    }
}

/// Why an object left the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    Offscreen,
    Collision,
}

/// Events emitted for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    CountdownTick { n: u8 },
    ObjectSpawned { id: u32, x: f32, size: f32, variant: u8 },
    ObjectMoved { id: u32, y: f32, size: f32 },
    ObjectRemoved { id: u32, reason: RemovalReason },
    GameOver { score: u64 },
    PlayerMoved { position: f32 },
    PlayerAnimation { state: PlayerAnimation },
    /// All surviving objects from the previous run were discarded
    RunReset,
}

/// Every periodic heartbeat of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    pub countdown: Timer,
    pub score: Timer,
    pub spawn: Timer,
    pub fall: Timer,
    pub player: Timer,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            countdown: Timer::disarmed(COUNTDOWN_PERIOD_US),
            score: Timer::disarmed(SCORE_PERIOD_US),
            spawn: Timer::disarmed(BASE_SPAWN_INTERVAL_MS * 1_000),
            fall: Timer::disarmed(FALL_PERIOD_US),
            player: Timer::disarmed(PLAYER_MOVE_PERIOD_US),
        }
    }
}

impl Timers {
    /// Stop every heartbeat
    pub fn disarm_all(&mut self) {
        self.countdown.disarm();
        self.score.disarm();
        self.spawn.disarm();
        self.fall.disarm();
        self.player.disarm();
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Seeded RNG, continues across restarts
    pub rng: Pcg32,
    /// Playfield geometry
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u64,
    /// Always `1 + score / 1000`
    pub speed_multiplier: f32,
    /// Base ticks elapsed while Running in the current run
    pub elapsed_ticks: u64,
    /// Simulated timeline in microseconds, never rewinds
    pub now_us: u64,
    pub player: Player,
    /// Live objects in spawn order
    pub objects: Vec<FallingObject>,
    pub timers: Timers,
    /// Objects spawned / removed in the current run
    pub spawned: u32,
    pub removed: u32,
    /// Pending events for the presentation layer
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings: settings.sanitized(),
            phase: GamePhase::NotStarted,
            score: 0,
            speed_multiplier: 1.0,
            elapsed_ticks: 0,
            now_us: 0,
            player: Player::new(),
            objects: Vec::new(),
            timers: Timers::default(),
            spawned: 0,
            removed: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Set the score and keep the speed multiplier in sync
    pub fn set_score(&mut self, score: u64) {
        debug_assert!(
            score >= self.score || !self.phase.is_running(),
            "score went backwards while running: {} -> {}",
            self.score,
            score
        );
        self.score = score;
        self.speed_multiplier = speed_multiplier(score);
    }

    /// Discard the current run, keeping RNG, timeline and id sequence.
    ///
    /// Returns the phase to `NotStarted` with every timer disarmed.
    pub fn reset_run(&mut self) {
        let had_objects = !self.objects.is_empty() || self.spawned > 0;
        self.phase = GamePhase::NotStarted;
        self.timers = Timers::default();
        self.set_score(0);
        self.elapsed_ticks = 0;
        self.objects.clear();
        self.spawned = 0;
        self.removed = 0;

        let previous = std::mem::take(&mut self.player);
        if had_objects {
            self.events.push(GameEvent::RunReset);
        }
        if previous.position != self.player.position {
            self.events.push(GameEvent::PlayerMoved {
                position: self.player.position,
            });
        }
        if previous.animation != self.player.animation {
            self.events.push(GameEvent::PlayerAnimation {
                state: self.player.animation,
            });
        }
    }

    /// Check the object-set invariants (debug builds only)
    pub fn debug_check_invariants(&self) {
        debug_assert!((0.0..=100.0).contains(&self.player.position));
        debug_assert!(
            self.objects.windows(2).all(|w| w[0].id < w[1].id),
            "live objects must be unique and in spawn order"
        );
        debug_assert_eq!(
            self.spawned as usize,
            self.removed as usize + self.objects.len(),
            "every spawned object is live or removed exactly once"
        );
    }
}
