//! Display configuration
//!
//! Motor geometry, flap alphabet, sensor filtering and homing parameters.
//! Defaults describe a 28BYJ-48 driven in half-step through a ULN2003 with an
//! A3144 hall switch, which is what the reference hardware uses.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::flap::{AlphabetError, FlapAlphabet};
use crate::motion::{OffsetPolicy, PhaseMode, StepMode};

use super::hardware::PinMap;

/// Half steps per output shaft revolution of a 28BYJ-48 (64 * 64:1 gearbox)
pub const DEFAULT_STEPS_PER_REVOLUTION: u32 = 4096;

/// Largest revolution whose two-turn seek bound still fits a `u32`
pub const MAX_STEPS_PER_REVOLUTION: u32 = u32::MAX / 2;

/// Delay between steps during normal moves and fast seek
pub const DEFAULT_STEP_DELAY_US: u32 = 2_000;

/// Delay between steps during the slow homing approach
pub const DEFAULT_SLOW_STEP_DELAY_US: u32 = 5_000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a section header nor `key = value`
    Syntax { line: u16 },
    /// Section name not recognized
    UnknownSection { line: u16 },
    /// Key not valid in its section
    UnknownKey { line: u16 },
    /// Value has the wrong type or is out of range
    InvalidValue { line: u16 },
    /// Pin string is not `gpioNN` with optional `!`/`^` modifiers
    InvalidPin { line: u16 },
    /// Alphabet rejected
    Alphabet(AlphabetError),
    /// Fewer steps per revolution than flaps
    TooFewSteps,
    /// Steps per revolution above [`MAX_STEPS_PER_REVOLUTION`]
    TooManySteps,
    /// A step delay of zero
    ZeroDelay,
    /// Sensor sample count of zero
    NoSamples,
    /// Home slot outside the alphabet
    HomeSlotOutOfRange(u8),
    /// Back-off would leave more than one flap for the slow approach
    BackoffTooLarge,
    /// One GPIO assigned twice
    PinConflict(u8),
}

impl From<AlphabetError> for ConfigError {
    fn from(e: AlphabetError) -> Self {
        ConfigError::Alphabet(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Syntax { line } => write!(f, "line {}: expected [section] or key = value", line),
            ConfigError::UnknownSection { line } => write!(f, "line {}: unknown section", line),
            ConfigError::UnknownKey { line } => write!(f, "line {}: unknown key", line),
            ConfigError::InvalidValue { line } => write!(f, "line {}: invalid value", line),
            ConfigError::InvalidPin { line } => write!(f, "line {}: invalid pin", line),
            ConfigError::Alphabet(e) => write!(f, "{}", e),
            ConfigError::TooFewSteps => f.write_str("fewer steps per revolution than flaps"),
            ConfigError::TooManySteps => {
                write!(f, "more than {} steps per revolution", MAX_STEPS_PER_REVOLUTION)
            }
            ConfigError::ZeroDelay => f.write_str("step delay must be non-zero"),
            ConfigError::NoSamples => f.write_str("sensor needs at least one sample"),
            ConfigError::HomeSlotOutOfRange(slot) => write!(f, "home slot {} is not on the drum", slot),
            ConfigError::BackoffTooLarge => f.write_str("back-off must be shorter than one flap"),
            ConfigError::PinConflict(pin) => write!(f, "gpio{} assigned twice", pin),
        }
    }
}

/// Hall sensor filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Samples per majority vote
    pub samples: u8,
    /// Pause after each sample
    pub sample_interval_us: u32,
    /// Output pulls low when the magnet is present (A3144 behaviour)
    pub active_low: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            samples: 5,
            sample_interval_us: 1_000,
            active_low: true,
        }
    }
}

/// Homing behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingConfig {
    /// Single fast seek, or fast seek then back-off and slow approach
    pub phase_mode: PhaseMode,
    /// How the offset relates to the reported home slot
    pub offset_policy: OffsetPolicy,
    /// Steps from the trigger point to the aligned flap; positive continues
    /// counterclockwise
    pub home_offset_steps: i32,
    /// Clockwise steps after the fast trigger
    pub backoff_steps: u16,
    /// Slot showing once homing completes
    pub home_slot: u8,
    /// Step delay for back-off, slow approach and the offset that follows it
    pub slow_step_delay_us: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            phase_mode: PhaseMode::CoarseFine,
            offset_policy: OffsetPolicy::TriggerStep,
            home_offset_steps: 0,
            backoff_steps: 5,
            home_slot: 18,
            slow_step_delay_us: DEFAULT_SLOW_STEP_DELAY_US,
        }
    }
}

/// Complete display unit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub step_mode: StepMode,
    /// Sequencer steps per drum revolution in `step_mode`
    pub steps_per_revolution: u32,
    pub step_delay_us: u32,
    pub alphabet: FlapAlphabet,
    pub sensor: SensorConfig,
    pub homing: HomingConfig,
    pub pins: PinMap,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            step_mode: StepMode::HalfStep,
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            step_delay_us: DEFAULT_STEP_DELAY_US,
            alphabet: FlapAlphabet::default(),
            sensor: SensorConfig::default(),
            homing: HomingConfig::default(),
            pins: PinMap::default(),
        }
    }
}

impl DisplayConfig {
    pub fn flaps(&self) -> u8 {
        self.alphabet.len()
    }

    /// Steps to advance one flap (truncated)
    pub fn steps_per_flap(&self) -> u32 {
        self.steps_per_revolution / self.flaps().max(1) as u32
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_revolution < self.flaps() as u32 {
            return Err(ConfigError::TooFewSteps);
        }
        if self.steps_per_revolution > MAX_STEPS_PER_REVOLUTION {
            return Err(ConfigError::TooManySteps);
        }
        if self.step_delay_us == 0 || self.homing.slow_step_delay_us == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.sensor.samples == 0 {
            return Err(ConfigError::NoSamples);
        }
        if self.homing.home_slot >= self.flaps() {
            return Err(ConfigError::HomeSlotOutOfRange(self.homing.home_slot));
        }
        if self.homing.phase_mode == PhaseMode::CoarseFine
            && self.homing.backoff_steps as u32 >= self.steps_per_flap()
        {
            return Err(ConfigError::BackoffTooLarge);
        }
        self.pins.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.flaps(), 36);
        assert_eq!(config.steps_per_flap(), 113);
        assert_eq!(config.step_mode, StepMode::HalfStep);
        assert_eq!(config.homing.home_slot, 18);
        assert_eq!(config.alphabet.symbol_at(18), Some('I'));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_full_step_geometry() {
        let config = DisplayConfig {
            step_mode: StepMode::FullStep,
            steps_per_revolution: 2048,
            ..DisplayConfig::default()
        };
        assert_eq!(config.steps_per_flap(), 56);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validation_errors() {
        let config = DisplayConfig {
            steps_per_revolution: 20,
            ..DisplayConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewSteps));

        let config = DisplayConfig {
            steps_per_revolution: 3_000_000_000,
            ..DisplayConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooManySteps));

        let config = DisplayConfig {
            steps_per_revolution: MAX_STEPS_PER_REVOLUTION,
            ..DisplayConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let config = DisplayConfig {
            step_delay_us: 0,
            ..DisplayConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDelay));

        let mut config = DisplayConfig::default();
        config.sensor.samples = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoSamples));

        let mut config = DisplayConfig::default();
        config.homing.home_slot = 36;
        assert_eq!(config.validate(), Err(ConfigError::HomeSlotOutOfRange(36)));

        let mut config = DisplayConfig::default();
        config.homing.backoff_steps = 113;
        assert_eq!(config.validate(), Err(ConfigError::BackoffTooLarge));
        config.homing.phase_mode = PhaseMode::Single;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_error_display() {
        use core::fmt::Write;
        let mut s: heapless::String<64> = heapless::String::new();
        write!(s, "{}", ConfigError::UnknownKey { line: 7 }).unwrap();
        assert_eq!(s.as_str(), "line 7: unknown key");
    }
}
