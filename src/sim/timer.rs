//! Periodic timers on the simulation timeline
//!
//! Every heartbeat of the game (countdown, scoring, spawning, falling, player
//! motion) is a `Timer` owned by the game state. Timers never fire on their
//! own: the tick function polls them against the current simulated time, so
//! disarming a timer is all it takes to guarantee it never mutates state again.

use serde::{Deserialize, Serialize};

/// A re-armable periodic timer measured in simulated microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Period used when the timer re-arms itself
    period_us: u64,
    /// Absolute due time, `None` while disarmed
    due_us: Option<u64>,
}

impl Timer {
    /// A timer that will not fire until armed
    pub const fn disarmed(period_us: u64) -> Self {
        Self {
            period_us,
            due_us: None,
        }
    }

    /// Arm the timer to fire one period after `now_us`
    pub fn arm(&mut self, now_us: u64) {
        self.due_us = Some(now_us + self.period_us);
    }

    /// Change the period and arm relative to `now_us`.
    ///
    /// Used by the spawner, whose period is recomputed at every firing.
    pub fn rearm(&mut self, now_us: u64, period_us: u64) {
        self.period_us = period_us.max(1);
        self.arm(now_us);
    }

    /// Stop the timer; it will not fire again until re-armed
    pub fn disarm(&mut self) {
        self.due_us = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_us.is_some()
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    pub fn due_us(&self) -> Option<u64> {
        self.due_us
    }

    /// Returns true (and schedules the next firing) if the timer is due.
    ///
    /// The next due time advances by whole periods from the previous due
    /// time, so a 16 667 µs timer polled every 1 000 µs keeps its average rate.
    pub fn poll(&mut self, now_us: u64) -> bool {
        match self.due_us {
            Some(due) if now_us >= due => {
                self.due_us = Some(due + self.period_us);
                true
            }
            _ => false,
        }
    }
}
