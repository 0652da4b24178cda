//! Sensor drivers

pub mod hall_switch;

pub use hall_switch::HallSwitch;
