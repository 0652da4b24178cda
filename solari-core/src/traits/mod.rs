//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. Blocking waits use
//! [`embedded_hal::delay::DelayNs`] directly.

pub mod coils;
pub mod sensor;

pub use coils::{CoilDriver, CoilState, Direction, COIL_COUNT};
pub use sensor::HomeSensor;
