//! Console UART receive task
//!
//! Assembles lines from the UART and forwards parsed commands to the
//! controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use solari_protocol::{Command, LineBuffer, Reply};

use crate::channels::{COMMAND_CHANNEL, REPLY_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Console RX task
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut line = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match line.feed(byte) {
                        Ok(Some(text)) => {
                            if let Some(command) = Command::parse(&text) {
                                debug!("Command: {:?}", command);
                                COMMAND_CHANNEL.send(command).await;
                            }
                        }
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Line error: {}", e);
                            if REPLY_CHANNEL.try_send(Reply::BadLine).is_err() {
                                warn!("Reply channel full, dropping reply");
                            }
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
