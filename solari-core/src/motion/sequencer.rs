//! Step sequencer
//!
//! Walks a [`StepPattern`] one entry at a time and writes each entry to the
//! coil bank. Timing between steps is owned by the caller.

use crate::motion::pattern::{StepMode, StepPattern};
use crate::traits::{CoilDriver, CoilState, Direction};

/// Drives a coil bank through its excitation table
pub struct StepSequencer<C> {
    coils: C,
    pattern: StepPattern,
    /// Current position in the pattern
    index: usize,
    /// Holding current applied
    energized: bool,
}

impl<C: CoilDriver> StepSequencer<C> {
    /// Create a sequencer with the coils released
    pub fn new(mut coils: C, mode: StepMode) -> Self {
        coils.release();
        Self {
            coils,
            pattern: mode.pattern(),
            index: 0,
            energized: false,
        }
    }

    /// Advance one physical step in `direction`
    pub fn step(&mut self, direction: Direction) {
        self.index = self.pattern.advance(self.index, direction.sign());
        self.coils.energize(self.pattern.state(self.index));
        self.energized = true;
    }

    /// De-energize all coils, keeping the pattern index
    pub fn release(&mut self) {
        self.coils.release();
        self.energized = false;
    }

    /// Current index into the pattern
    pub fn index(&self) -> usize {
        self.index
    }

    /// Coil state the index points at (applied only while energized)
    pub fn current_state(&self) -> CoilState {
        if self.energized {
            self.pattern.state(self.index)
        } else {
            CoilState::OFF
        }
    }

    /// Check if holding current is applied
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// Excitation table in use
    pub fn pattern(&self) -> StepPattern {
        self.pattern
    }

    /// Borrow the coil driver
    pub fn coils(&self) -> &C {
        &self.coils
    }

    /// Consume the sequencer and return the coil driver
    pub fn into_coils(self) -> C {
        self.coils
    }
}
