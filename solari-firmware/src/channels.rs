//! Inter-task communication channels
//!
//! Console RX feeds parsed commands to the controller; the controller's
//! replies go to console TX.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use solari_protocol::{Command, Reply};

/// Channel capacity for parsed console commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for replies awaiting transmission
const REPLY_CHANNEL_SIZE: usize = 8;

/// Commands from the console, in arrival order
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Reply lines for the console
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, Reply, REPLY_CHANNEL_SIZE> =
    Channel::new();
