//! Coil excitation tables

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::CoilState;

const fn coils(a: u8, b: u8, c: u8, d: u8) -> CoilState {
    CoilState::from_bits(a | (b << 1) | (c << 2) | (d << 3))
}

/// Two-phase full stepping: two adjacent coils on at all times
const FULL_STEP: [CoilState; 4] = [
    coils(1, 1, 0, 0),
    coils(0, 1, 1, 0),
    coils(0, 0, 1, 1),
    coils(1, 0, 0, 1),
];

/// Half stepping: alternates single and double coil activation
const HALF_STEP: [CoilState; 8] = [
    coils(1, 0, 0, 0),
    coils(1, 1, 0, 0),
    coils(0, 1, 0, 0),
    coils(0, 1, 1, 0),
    coils(0, 0, 1, 0),
    coils(0, 0, 1, 1),
    coils(0, 0, 0, 1),
    coils(1, 0, 0, 1),
];

/// Stepper excitation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepMode {
    /// 4-entry table, more torque, half the resolution
    FullStep,
    /// 8-entry table (2048 full steps = 4096 half steps on a 28BYJ-48)
    #[default]
    HalfStep,
}

impl StepMode {
    /// Excitation table for this mode
    pub fn pattern(self) -> StepPattern {
        match self {
            StepMode::FullStep => StepPattern { states: &FULL_STEP },
            StepMode::HalfStep => StepPattern { states: &HALF_STEP },
        }
    }
}

/// Cyclic coil excitation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPattern {
    states: &'static [CoilState],
}

impl StepPattern {
    /// Number of entries before the sequence repeats
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Patterns are never empty
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Coil state at `index`, wrapping modulo the pattern length
    pub fn state(&self, index: usize) -> CoilState {
        self.states[index % self.states.len()]
    }

    /// Find the position of a coil state in the table
    pub fn index_of(&self, state: CoilState) -> Option<usize> {
        self.states.iter().position(|s| *s == state)
    }

    /// Index reached by moving one entry in `sign` direction from `index`
    pub fn advance(&self, index: usize, sign: i8) -> usize {
        let len = self.states.len();
        if sign >= 0 {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        }
    }
}
