//! Session state machine
//!
//! Tracks whether the display holds a trusted position, is busy, or has
//! given up. The controller drives it; nothing else mutates it.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
