//! Digital hall switch input
//!
//! Reports the raw line level. Polarity (magnet = low for the A3144) and
//! debouncing are handled by `solari_core::sensor::HallSensor`; `inverted`
//! only compensates for an inverting stage between sensor and MCU.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use solari_core::traits::HomeSensor;

/// Hall switch on one input pin
pub struct HallSwitch<P> {
    pin: P,
    inverted: bool,
}

impl<P: InputPin<Error = Infallible>> HallSwitch<P> {
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: InputPin<Error = Infallible>> HomeSensor for HallSwitch<P> {
    fn level(&mut self) -> bool {
        let high = match self.pin.is_high() {
            Ok(high) => high,
            Err(never) => match never {},
        };
        high != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    struct MockInput {
        high: bool,
    }

    impl ErrorType for MockInput {
        type Error = Infallible;
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_reports_line_level() {
        let mut switch = HallSwitch::new(MockInput { high: true }, false);
        assert!(switch.level());
        let mut switch = HallSwitch::new(MockInput { high: false }, false);
        assert!(!switch.level());
    }

    #[test]
    fn test_inverted() {
        let mut switch = HallSwitch::new(MockInput { high: true }, true);
        assert!(!switch.level());
    }

    #[test]
    fn test_feeds_debounced_sensor() {
        use solari_core::config::SensorConfig;
        use solari_core::sensor::{HallReading, HallSensor};

        struct NoDelay;
        impl embedded_hal::delay::DelayNs for NoDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        // A3144 pulls low at the magnet
        let switch = HallSwitch::new(MockInput { high: false }, false);
        let mut sensor = HallSensor::new(switch, SensorConfig::default());
        assert_eq!(sensor.read(&mut NoDelay), HallReading::HomeDetected);
    }
}
