//! Motion control
//!
//! Coil sequencing and homing for the flap drum stepper.

pub mod homing;
pub mod pattern;
pub mod sequencer;

pub use homing::{HomingController, HomingError, HomingOutcome, HomingState, OffsetPolicy, PhaseMode};
pub use pattern::{StepMode, StepPattern};
pub use sequencer::StepSequencer;
