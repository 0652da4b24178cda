//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, so pin numbers can
//! come from `display.toml` rather than being hardcoded. GPIO0/GPIO1 carry
//! the console UART and are handed out separately as typed pins.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals;
use embassy_rp::Peri;
use embassy_rp::Peripherals;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Console UART TX
pub const CONSOLE_TX_PIN: u8 = 0;

/// Console UART RX
pub const CONSOLE_RX_PIN: u8 = 1;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin reserved for the console UART
    Reserved(u8),
}

impl core::fmt::Display for PinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PinError::InvalidPin(pin) => write!(f, "gpio{} does not exist", pin),
            PinError::AlreadyTaken(pin) => write!(f, "gpio{} already in use", pin),
            PinError::Reserved(pin) => write!(f, "gpio{} is reserved for the console", pin),
        }
    }
}

/// Check that a pin number can be handed out by the bank
pub fn check_pin(pin: u8) -> Result<(), PinError> {
    if pin >= GPIO_COUNT {
        return Err(PinError::InvalidPin(pin));
    }
    if pin == CONSOLE_TX_PIN || pin == CONSOLE_RX_PIN {
        return Err(PinError::Reserved(pin));
    }
    Ok(())
}

/// Pin bank that holds the general-purpose GPIOs and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Create a new pin bank
    ///
    /// Moves every pin out of `p`. After this call, pins must be obtained
    /// through `take()`.
    pub fn new(p: &mut PinBankPeripherals) -> Self {
        Self {
            pins: [
                None,
                None,
                p.pin2.take().map(Into::into),
                p.pin3.take().map(Into::into),
                p.pin4.take().map(Into::into),
                p.pin5.take().map(Into::into),
                p.pin6.take().map(Into::into),
                p.pin7.take().map(Into::into),
                p.pin8.take().map(Into::into),
                p.pin9.take().map(Into::into),
                p.pin10.take().map(Into::into),
                p.pin11.take().map(Into::into),
                p.pin12.take().map(Into::into),
                p.pin13.take().map(Into::into),
                p.pin14.take().map(Into::into),
                p.pin15.take().map(Into::into),
                p.pin16.take().map(Into::into),
                p.pin17.take().map(Into::into),
                p.pin18.take().map(Into::into),
                p.pin19.take().map(Into::into),
                p.pin20.take().map(Into::into),
                p.pin21.take().map(Into::into),
                p.pin22.take().map(Into::into),
                p.pin23.take().map(Into::into),
                p.pin24.take().map(Into::into),
                p.pin25.take().map(Into::into),
                p.pin26.take().map(Into::into),
                p.pin27.take().map(Into::into),
                p.pin28.take().map(Into::into),
                p.pin29.take().map(Into::into),
            ],
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        check_pin(pin_num)?;
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }
}

/// GPIOs that will be moved into the PinBank
pub struct PinBankPeripherals {
    pub pin2: Option<Peri<'static, peripherals::PIN_2>>,
    pub pin3: Option<Peri<'static, peripherals::PIN_3>>,
    pub pin4: Option<Peri<'static, peripherals::PIN_4>>,
    pub pin5: Option<Peri<'static, peripherals::PIN_5>>,
    pub pin6: Option<Peri<'static, peripherals::PIN_6>>,
    pub pin7: Option<Peri<'static, peripherals::PIN_7>>,
    pub pin8: Option<Peri<'static, peripherals::PIN_8>>,
    pub pin9: Option<Peri<'static, peripherals::PIN_9>>,
    pub pin10: Option<Peri<'static, peripherals::PIN_10>>,
    pub pin11: Option<Peri<'static, peripherals::PIN_11>>,
    pub pin12: Option<Peri<'static, peripherals::PIN_12>>,
    pub pin13: Option<Peri<'static, peripherals::PIN_13>>,
    pub pin14: Option<Peri<'static, peripherals::PIN_14>>,
    pub pin15: Option<Peri<'static, peripherals::PIN_15>>,
    pub pin16: Option<Peri<'static, peripherals::PIN_16>>,
    pub pin17: Option<Peri<'static, peripherals::PIN_17>>,
    pub pin18: Option<Peri<'static, peripherals::PIN_18>>,
    pub pin19: Option<Peri<'static, peripherals::PIN_19>>,
    pub pin20: Option<Peri<'static, peripherals::PIN_20>>,
    pub pin21: Option<Peri<'static, peripherals::PIN_21>>,
    pub pin22: Option<Peri<'static, peripherals::PIN_22>>,
    pub pin23: Option<Peri<'static, peripherals::PIN_23>>,
    pub pin24: Option<Peri<'static, peripherals::PIN_24>>,
    pub pin25: Option<Peri<'static, peripherals::PIN_25>>,
    pub pin26: Option<Peri<'static, peripherals::PIN_26>>,
    pub pin27: Option<Peri<'static, peripherals::PIN_27>>,
    pub pin28: Option<Peri<'static, peripherals::PIN_28>>,
    pub pin29: Option<Peri<'static, peripherals::PIN_29>>,
}

impl PinBankPeripherals {
    /// Split Embassy Peripherals into bank pins and the console peripherals
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let pins = Self {
            pin2: Some(p.PIN_2),
            pin3: Some(p.PIN_3),
            pin4: Some(p.PIN_4),
            pin5: Some(p.PIN_5),
            pin6: Some(p.PIN_6),
            pin7: Some(p.PIN_7),
            pin8: Some(p.PIN_8),
            pin9: Some(p.PIN_9),
            pin10: Some(p.PIN_10),
            pin11: Some(p.PIN_11),
            pin12: Some(p.PIN_12),
            pin13: Some(p.PIN_13),
            pin14: Some(p.PIN_14),
            pin15: Some(p.PIN_15),
            pin16: Some(p.PIN_16),
            pin17: Some(p.PIN_17),
            pin18: Some(p.PIN_18),
            pin19: Some(p.PIN_19),
            pin20: Some(p.PIN_20),
            pin21: Some(p.PIN_21),
            pin22: Some(p.PIN_22),
            pin23: Some(p.PIN_23),
            pin24: Some(p.PIN_24),
            pin25: Some(p.PIN_25),
            pin26: Some(p.PIN_26),
            pin27: Some(p.PIN_27),
            pin28: Some(p.PIN_28),
            pin29: Some(p.PIN_29),
        };
        let remaining = RemainingPeripherals {
            uart0: p.UART0,
            console_tx: p.PIN_0,
            console_rx: p.PIN_1,
        };
        (pins, remaining)
    }
}

/// Console peripherals left after creating the PinBank
pub struct RemainingPeripherals {
    pub uart0: Peri<'static, peripherals::UART0>,
    pub console_tx: Peri<'static, peripherals::PIN_0>,
    pub console_rx: Peri<'static, peripherals::PIN_1>,
}
