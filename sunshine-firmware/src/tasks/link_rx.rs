//! Companion link receive task
//!
//! Receives frames from the companion and forwards them to the face task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use sunshine_core::sync::LinkEvent;
use sunshine_protocol::{CompanionMessage, FrameParser};

use crate::channels::{FaceEvent, FACE_EVENTS};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the companion
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match CompanionMessage::from_frame(&frame) {
                            Ok(msg) => handle_message(msg).await,
                            Err(e) => {
                                warn!("Failed to decode companion message: {:?}", e);
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Forward a decoded companion message
async fn handle_message(msg: CompanionMessage) {
    if let CompanionMessage::TimeSync {
        epoch_ms,
        utc_offset_minutes,
    } = msg
    {
        FACE_EVENTS
            .send(FaceEvent::TimeSync {
                epoch_ms,
                utc_offset_minutes,
            })
            .await;
        return;
    }

    if let Some(event) = LinkEvent::from_message(msg) {
        debug!("Link event: {:?}", event);
        FACE_EVENTS.send(FaceEvent::Link(event)).await;
    }
}
