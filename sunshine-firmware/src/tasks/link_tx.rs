//! Companion link transmit task
//!
//! Encodes link commands from the face task and writes them to the UART.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use sunshine_core::sync::LinkCommand;

use crate::channels::LINK_TX;

/// Link TX task - sends frames to the companion
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let cmd = LINK_TX.receive().await;
        send_command(&mut tx, cmd).await;
    }
}

async fn send_command(tx: &mut BufferedUartTx, cmd: LinkCommand) {
    let msg = match cmd.to_message() {
        Ok(msg) => msg,
        Err(e) => {
            error!("Failed to build {:?}: {:?}", cmd, e);
            return;
        }
    };

    let bytes = match msg.to_frame().and_then(|frame| frame.encode_to_vec()) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to encode {:?}: {:?}", cmd, e);
            return;
        }
    };

    if let Err(e) = tx.write_all(&bytes).await {
        warn!("Failed to send {:?}: {:?}", cmd, e);
    } else {
        trace!("{:?} sent", cmd);
    }
}
