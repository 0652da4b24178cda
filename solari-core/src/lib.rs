//! Board-agnostic core logic for the split-flap display firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (coil bank, home sensor)
//! - Step sequencing for unipolar steppers
//! - Debounced hall sensor sampling
//! - Two-phase homing against a single magnet
//! - Symbol-to-slot mapping and counterclockwise flap distance
//! - Display controller and session state machine
//! - Configuration types and the embedded config parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod display;
pub mod flap;
pub mod motion;
pub mod sensor;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
