//! RP2040-specific HAL for the split-flap display firmware
//!
//! - Pin bank for taking GPIOs by number at runtime
//! - Config-driven setup of the coil, hall and LED pins

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::{claim_display_pins, DisplayPins};
pub use pins::{PinBank, PinBankPeripherals, PinError, RemainingPeripherals};
