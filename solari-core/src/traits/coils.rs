//! Stepper coil bank trait
//!
//! A unipolar stepper (28BYJ-48 behind a ULN2003, or similar) is driven by
//! switching its four coils on and off in a fixed cyclic order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of coils in the bank
pub const COIL_COUNT: usize = 4;

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (+1 through the step pattern)
    Clockwise,
    /// Counter-clockwise rotation (-1 through the step pattern)
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Signed unit step for this direction
    pub fn sign(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// On/off state of all four coils
///
/// Bit 0 is coil A, bit 3 is coil D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilState(u8);

impl CoilState {
    /// All coils de-energized
    pub const OFF: CoilState = CoilState(0);

    /// Build from a bit vector (only the low four bits are used)
    pub const fn from_bits(bits: u8) -> Self {
        CoilState(bits & 0x0F)
    }

    /// Raw bit vector
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check whether a coil (0..4) is energized
    pub const fn is_active(self, coil: usize) -> bool {
        coil < COIL_COUNT && (self.0 >> coil) & 1 == 1
    }

    /// Number of energized coils
    pub const fn active_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if no coil is energized
    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

/// Trait for stepper coil outputs
///
/// Writes are assumed to always succeed.
pub trait CoilDriver {
    /// Drive the coils to the given pattern
    fn energize(&mut self, state: CoilState);

    /// De-energize every coil
    ///
    /// The motor no longer holds position; the flap mechanism's own
    /// detent keeps it in place.
    fn release(&mut self) {
        self.energize(CoilState::OFF);
    }
}

impl<T: CoilDriver + ?Sized> CoilDriver for &mut T {
    fn energize(&mut self, state: CoilState) {
        (**self).energize(state)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
