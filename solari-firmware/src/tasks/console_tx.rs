//! Console UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPLY_CHANNEL;

/// Console TX task - writes each reply as one CRLF-terminated line
#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx) {
    info!("Console TX task started");

    loop {
        let reply = REPLY_CHANNEL.receive().await;
        let line = reply.render();

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send reply: {:?}", e);
            continue;
        }
        if let Err(e) = tx.write_all(b"\r\n").await {
            warn!("Failed to send line end: {:?}", e);
        }
    }
}
