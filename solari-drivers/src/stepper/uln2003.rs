//! ULN2003 coil driver
//!
//! Four GPIOs feed IN1..IN4 of a ULN2003 Darlington array, which sinks the
//! four coil ends of a unipolar stepper such as the 28BYJ-48. A high input
//! energizes the coil, unless the pin is configured inverted (for boards that
//! put an extra inverting buffer in front of the array).

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use solari_core::traits::{CoilDriver, CoilState, COIL_COUNT};

/// Coil bank on four output pins
pub struct Uln2003<P> {
    pins: [P; COIL_COUNT],
    /// Per-pin polarity; true means coil ON = pin LOW
    inverted: [bool; COIL_COUNT],
    state: CoilState,
}

impl<P: OutputPin<Error = Infallible>> Uln2003<P> {
    /// Create a coil bank with all coils released
    ///
    /// `pins` are IN1..IN4 in coil order A, B, C, D.
    pub fn new(pins: [P; COIL_COUNT], inverted: [bool; COIL_COUNT]) -> Self {
        let mut bank = Self {
            pins,
            inverted,
            state: CoilState::OFF,
        };
        bank.write(CoilState::OFF);
        bank
    }

    /// Create a coil bank where high energizes every coil
    pub fn new_active_high(pins: [P; COIL_COUNT]) -> Self {
        Self::new(pins, [false; COIL_COUNT])
    }

    /// Last state written to the pins
    pub fn state(&self) -> CoilState {
        self.state
    }

    /// Release and return the pins
    pub fn free(mut self) -> [P; COIL_COUNT] {
        self.write(CoilState::OFF);
        self.pins
    }

    fn write(&mut self, state: CoilState) {
        for (coil, pin) in self.pins.iter_mut().enumerate() {
            let on = state.is_active(coil);
            // Output pins here cannot fail
            let _ = if on != self.inverted[coil] {
                pin.set_high()
            } else {
                pin.set_low()
            };
        }
        self.state = state;
    }
}

impl<P: OutputPin<Error = Infallible>> CoilDriver for Uln2003<P> {
    fn energize(&mut self, state: CoilState) {
        self.write(state);
    }
}
