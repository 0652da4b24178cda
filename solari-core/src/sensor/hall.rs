//! Hall effect home sensor
//!
//! A digital hall switch (with the RP2040 pull-up enabled) pulls its line low
//! while the drum magnet is in front of it. Reads near the edge of the
//! magnet bounce, so every reading is a majority vote over several samples
//! spaced a fixed time apart.

use embedded_hal::delay::DelayNs;

use crate::config::SensorConfig;
use crate::traits::HomeSensor;

/// Debounced sensor result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HallReading {
    /// Magnet in front of the sensor
    HomeDetected,
    /// No magnet
    Clear,
}

impl HallReading {
    /// Interpret a line level according to sensor polarity
    pub fn from_level(level_high: bool, active_low: bool) -> Self {
        if level_high != active_low {
            HallReading::HomeDetected
        } else {
            HallReading::Clear
        }
    }

    /// Check if the home magnet was detected
    pub fn is_home(self) -> bool {
        self == HallReading::HomeDetected
    }
}

/// Majority-vote wrapper around a raw [`HomeSensor`]
///
/// Stateless between calls.
pub struct HallSensor<S> {
    sensor: S,
    config: SensorConfig,
}

impl<S: HomeSensor> HallSensor<S> {
    /// Create a new debounced hall sensor
    pub fn new(sensor: S, config: SensorConfig) -> Self {
        Self { sensor, config }
    }

    /// Read using the configured sample count
    pub fn read<D: DelayNs>(&mut self, delay: &mut D) -> HallReading {
        self.read_with(self.config.samples, delay)
    }

    /// Take `samples` raw reads and return the majority value
    ///
    /// Each raw read is followed by the configured sample interval. With 5
    /// samples, 3 agreeing reads decide the result, so up to 2 bounces are
    /// tolerated. A sample count of 0 is treated as 1.
    pub fn read_with<D: DelayNs>(&mut self, samples: u8, delay: &mut D) -> HallReading {
        let samples = samples.max(1);
        let mut high = 0u8;

        for _ in 0..samples {
            if self.sensor.level() {
                high += 1;
            }
            delay.delay_us(self.config.sample_interval_us);
        }

        HallReading::from_level(high > samples / 2, self.config.active_low)
    }

    /// Borrow the raw sensor
    pub fn inner(&self) -> &S {
        &self.sensor
    }

    /// Consume and return the raw sensor
    pub fn into_inner(self) -> S {
        self.sensor
    }
}
