//! Pin assignments
//!
//! GPIO numbers for the ULN2003 inputs, the hall switch and the status LED.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Every pin the display unit drives or reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    /// ULN2003 IN1..IN4, coil A first
    pub coils: [PinConfig; 4],
    /// Open-collector hall switch output
    pub hall: PinConfig,
    /// Status LED
    pub led: PinConfig,
}

impl PinMap {
    /// All pins, coils first
    pub fn all(&self) -> [PinConfig; 6] {
        [
            self.coils[0],
            self.coils[1],
            self.coils[2],
            self.coils[3],
            self.hall,
            self.led,
        ]
    }

    /// Reject maps that assign one GPIO to two functions
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.all();
        for (i, a) in pins.iter().enumerate() {
            if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::PinConflict(a.pin));
            }
        }
        Ok(())
    }
}

impl Default for PinMap {
    /// Pico carrier board: ULN2003 on GP2..GP5, A3144 on GP18, onboard LED
    fn default() -> Self {
        Self {
            coils: [
                PinConfig::new(2),
                PinConfig::new(3),
                PinConfig::new(4),
                PinConfig::new(5),
            ],
            hall: PinConfig::with_pullup(18),
            led: PinConfig::new(25),
        }
    }
}
