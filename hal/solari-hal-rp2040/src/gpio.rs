//! Display pin setup
//!
//! Turns the `[pins]` section of the display config into configured
//! embassy GPIO drivers. Outputs start at their inactive level so no coil
//! is energized and the LED is dark until the controller says otherwise.

use embassy_rp::gpio::{Input, Level, Output, Pull};
use solari_core::config::{PinConfig, PinMap};

use crate::pins::{check_pin, PinBank, PinError};

/// Configured GPIO drivers for one display unit
pub struct DisplayPins {
    /// ULN2003 IN1..IN4
    pub coils: [Output<'static>; 4],
    pub hall: Input<'static>,
    pub led: Output<'static>,
}

/// Check every pin in the map before any of them is taken
pub fn check_pin_map(map: &PinMap) -> Result<(), PinError> {
    for pin in map.all() {
        check_pin(pin.pin)?;
    }
    Ok(())
}

/// Level that leaves an output inactive
pub fn inactive_level(pin: PinConfig) -> Level {
    if pin.inverted {
        Level::High
    } else {
        Level::Low
    }
}

/// Input pull for a configured pin
pub fn pull(pin: PinConfig) -> Pull {
    if pin.pull_up {
        Pull::Up
    } else {
        Pull::None
    }
}

/// Take an output pin, initially inactive
pub fn output(bank: &mut PinBank, pin: PinConfig) -> Result<Output<'static>, PinError> {
    Ok(Output::new(bank.take(pin.pin)?, inactive_level(pin)))
}

/// Take an input pin with its configured pull
pub fn input(bank: &mut PinBank, pin: PinConfig) -> Result<Input<'static>, PinError> {
    Ok(Input::new(bank.take(pin.pin)?, pull(pin)))
}

/// Take and configure every pin the display uses
pub fn claim_display_pins(bank: &mut PinBank, map: &PinMap) -> Result<DisplayPins, PinError> {
    check_pin_map(map)?;

    let coils = [
        output(bank, map.coils[0])?,
        output(bank, map.coils[1])?,
        output(bank, map.coils[2])?,
        output(bank, map.coils[3])?,
    ];
    let hall = input(bank, map.hall)?;
    let led = output(bank, map.led)?;

    Ok(DisplayPins { coils, hall, led })
}
