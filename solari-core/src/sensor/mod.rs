//! Sensor sampling
//!
//! Debounced reading of the home magnet sensor.

pub mod hall;

pub use hall::{HallReading, HallSensor};
