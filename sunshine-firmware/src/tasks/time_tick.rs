//! Minute tick task
//!
//! Sends [`FaceEvent::TimeTick`] on every wall-clock minute boundary. This
//! is the only redraw source while the face is in ambient mode.

use defmt::*;
use embassy_time::Timer;

use sunshine_core::scheduler::next_aligned;

use crate::channels::{FaceEvent, FACE_EVENTS};
use crate::clock;

/// Minute in milliseconds
const MINUTE_MS: u64 = 60_000;

#[embassy_executor::task]
pub async fn time_tick_task() {
    info!("Time tick task started");

    loop {
        let now = clock::now_ms();
        Timer::after_millis(next_aligned(now, MINUTE_MS) - now).await;

        trace!("Minute tick");
        FACE_EVENTS.send(FaceEvent::TimeTick).await;
    }
}
