//! Status LED
//!
//! Lit while the display holds a trusted position, dark while homing,
//! moving from an unreliable position, or after the session halts.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use solari_core::state::State;

/// LED on one output pin
pub struct StatusLed<P> {
    pin: P,
    /// If true, LED ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin<Error = Infallible>> StatusLed<P> {
    /// Create a new LED, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            on: false,
        };
        led.set(false);
        led
    }

    pub fn set(&mut self, on: bool) {
        self.on = on;
        let _ = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Reflect the session state
    pub fn show(&mut self, state: State) {
        self.set(state.position_trusted());
    }
}
