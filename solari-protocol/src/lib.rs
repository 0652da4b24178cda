//! Console protocol for the Solari split-flap display
//!
//! The display is driven over a plain text console (UART). Each line the
//! operator types is one command; each command produces at most one reply
//! line.
//!
//! # Protocol Overview
//!
//! ```text
//!   operator                         controller
//!      │  "Q\r\n"                        │
//!      ├────────────────────────────────▶│  LineBuffer → Command::Show('Q')
//!      │  "OK I -> Q (28 flaps)\r\n"     │
//!      │◀────────────────────────────────┤  Reply::Moved
//! ```
//!
//! | input          | command            |
//! |----------------|--------------------|
//! | *(empty)*      | ignored            |
//! | one printable ASCII character (any case) | [`Command::Show`] |
//! | `HOME`         | [`Command::Home`]  |
//! | `STATUS`       | [`Command::Status`]|
//! | `HALL`         | [`Command::Hall`]  |
//! | anything else  | [`Command::Invalid`] |

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod line;
pub mod reply;

pub use command::Command;
pub use line::{LineBuffer, LineError, MAX_LINE_LEN};
pub use reply::{Reply, MAX_REPLY_LEN};
