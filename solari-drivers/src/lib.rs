//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in solari-core on top of `embedded-hal` digital pins:
//!
//! - ULN2003 Darlington array driving a unipolar stepper
//! - Open-collector hall switch (A3144 and similar)
//! - Status LED

#![no_std]
#![deny(unsafe_code)]

pub mod led;
pub mod sensor;
pub mod stepper;

pub use led::StatusLed;
pub use sensor::HallSwitch;
pub use stepper::Uln2003;
