//! Display controller
//!
//! Owns the motor, the sensor and the believed flap position, and turns
//! console commands into moves and replies.

pub mod controller;

pub use controller::{DisplayController, DisplayError, DisplayStatus, MoveOutcome};
