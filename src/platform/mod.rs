//! Platform abstraction layer
//!
//! Maps browser keyboard events onto simulation intents. Kept free of
//! web-sys types so the mapping is testable natively.

use crate::sim::MoveDirection;

/// Movement direction bound to a `KeyboardEvent.key` value
pub fn key_direction(key: &str) -> Option<MoveDirection> {
    match key {
        "a" | "A" | "ArrowLeft" => Some(MoveDirection::Left),
        "d" | "D" | "ArrowRight" => Some(MoveDirection::Right),
        _ => None,
    }
}

/// A key transition translated into an intent: `(direction, active)`
pub fn key_intent(key: &str, pressed: bool) -> Option<(MoveDirection, bool)> {
    key_direction(key).map(|dir| (dir, pressed))
}

/// Key that toggles sound on and off
pub fn is_mute_key(key: &str) -> bool {
    matches!(key, "m" | "M")
}
