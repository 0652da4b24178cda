//! Line assembly for the console byte stream
//!
//! Bytes arrive from the UART in arbitrary chunks. [`LineBuffer`] collects
//! them until a terminator (`\r`, `\n` or `\r\n`) and hands back the
//! complete line.

use heapless::{String, Vec};

/// Longest accepted command line (without terminator)
pub const MAX_LINE_LEN: usize = 32;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Errors produced while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is discarded
    Overflow,
    /// Line was not valid UTF-8
    InvalidUtf8,
}

impl core::fmt::Display for LineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LineError::Overflow => f.write_str("line too long"),
            LineError::InvalidUtf8 => f.write_str("line is not valid text"),
        }
    }
}

/// Incremental line assembler
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Dropping bytes until the next terminator after an overflow
    discarding: bool,
    /// Previous byte was CR, so a following LF is swallowed
    after_cr: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to an empty buffer
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.after_cr = false;
    }

    /// Number of bytes buffered for the current line
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a line,
    /// `Ok(None)` when more bytes are needed. An overflow is reported once,
    /// on the byte that overflowed; the remainder of that line is dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<MAX_LINE_LEN>>, LineError> {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == CR);

        match byte {
            LF if after_cr => Ok(None),
            CR | LF => {
                if self.discarding {
                    self.reset();
                    self.after_cr = byte == CR;
                    return Ok(None);
                }
                let bytes = core::mem::take(&mut self.buffer);
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| LineError::InvalidUtf8)
            }
            BACKSPACE | DELETE => {
                if !self.discarding {
                    self.buffer.pop();
                }
                Ok(None)
            }
            _ if self.discarding => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }
}
