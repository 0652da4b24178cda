//! Reply lines sent back to the console

use core::fmt::{self, Write};

use heapless::String;

/// Longest rendered reply (without terminator)
pub const MAX_REPLY_LEN: usize = 80;

/// A reply to one console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Startup homing succeeded, commands are now accepted
    Ready { slot: u8, symbol: char },
    /// Display rotated to a new symbol
    Moved { from: char, to: char, flaps: u8 },
    /// Requested symbol was already showing; nothing moved
    AlreadyShowing(char),
    /// Re-home succeeded
    Homed { slot: u8, symbol: char },
    /// Homing never saw the magnet; the stored position is no longer trustworthy
    HomingFailed { steps: u32 },
    /// Homing lost the magnet on the slow re-approach
    HomeLost { steps: u32 },
    /// Homing could not get the sensor to read clear
    SensorStuck { steps: u32 },
    /// Character is not printed on any flap
    UnknownSymbol(char),
    /// Display has not completed startup homing
    NotHomed,
    /// Session has ended after a fatal error
    Halted,
    /// Current position report
    Status { slot: u8, symbol: char, trusted: bool },
    /// Debounced hall sensor reading
    Hall { home_detected: bool },
    /// Unrecognized command
    Rejected,
    /// Input line was too long or not text
    BadLine,
}

impl Reply {
    /// Returns true if this reply reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Reply::HomingFailed { .. }
                | Reply::HomeLost { .. }
                | Reply::SensorStuck { .. }
                | Reply::UnknownSymbol(_)
                | Reply::NotHomed
                | Reply::Halted
                | Reply::Rejected
                | Reply::BadLine
        )
    }

    /// Render this reply as a text line
    pub fn render(&self) -> String<MAX_REPLY_LEN> {
        let mut line = String::new();
        // Every variant fits in MAX_REPLY_LEN
        let _ = write!(line, "{}", self);
        line
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Ready { slot, symbol } => {
                write!(f, "READY homed at slot {} ({})", slot, symbol)
            }
            Reply::Moved { from, to, flaps } => {
                write!(f, "OK {} -> {} ({} flaps)", from, to, flaps)
            }
            Reply::AlreadyShowing(symbol) => write!(f, "OK already showing {}", symbol),
            Reply::Homed { slot, symbol } => write!(f, "OK homed at slot {} ({})", slot, symbol),
            Reply::HomingFailed { steps } => write!(
                f,
                "ERR home not found after {} steps; position unreliable",
                steps
            ),
            Reply::HomeLost { steps } => write!(
                f,
                "ERR home lost on slow approach after {} steps; position unreliable",
                steps
            ),
            Reply::SensorStuck { steps } => write!(
                f,
                "ERR home sensor stuck active after {} steps; position unreliable",
                steps
            ),
            Reply::UnknownSymbol(c) => write!(f, "ERR no flap for '{}'", c),
            Reply::NotHomed => f.write_str("ERR not homed"),
            Reply::Halted => f.write_str("ERR halted"),
            Reply::Status {
                slot,
                symbol,
                trusted,
            } => write!(
                f,
                "STATUS slot {} ({}){}",
                slot,
                symbol,
                if trusted { "" } else { " unreliable" }
            ),
            Reply::Hall { home_detected } => {
                f.write_str(if home_detected { "HALL magnet" } else { "HALL clear" })
            }
            Reply::Rejected => f.write_str("ERR unknown command; send a symbol or HOME"),
            Reply::BadLine => f.write_str("ERR bad input line"),
        }
    }
}
