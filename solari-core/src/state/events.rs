//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Homing events
    /// A homing run began
    HomingStarted,
    /// Home found and offset applied
    HomingSucceeded,
    /// Home not found within the step bound
    HomingFailed,

    // Motion events
    /// A flap move began
    MoveStarted,
    /// The flap move completed all its steps
    MoveFinished,
}
