//! DOM renderer
//!
//! Applies simulation events to the page: the player sprite, one `<div>` per
//! falling object, the score line and the start/end screens.

pub mod dom;

pub use dom::DomRenderer;
