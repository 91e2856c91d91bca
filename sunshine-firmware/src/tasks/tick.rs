//! Redraw timer task
//!
//! Platform side of the face's single tick slot. Holds at most one armed
//! deadline; a new command replaces it. Firing reports the token back so
//! the face can ignore ticks it already cancelled.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

use sunshine_core::scheduler::{TickToken, TimerCommand};

use crate::channels::{FaceEvent, FACE_EVENTS, TIMER_CMD};
use crate::clock;

/// Tick task - one-shot redraw timer
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut armed: Option<(Instant, TickToken)> = None;

    loop {
        let deadline = armed.map(|(deadline, _)| deadline);
        let wait_deadline = async move {
            match deadline {
                Some(deadline) => Timer::at(deadline).await,
                None => core::future::pending::<()>().await,
            }
        };

        match select(TIMER_CMD.wait(), wait_deadline).await {
            Either::First(TimerCommand::Arm { due_at, token }) => {
                // due_at is wall-clock time; wait relative to now
                let delay = due_at.saturating_sub(clock::now_ms());
                armed = Some((Instant::now() + Duration::from_millis(delay), token));
            }
            Either::First(TimerCommand::Cancel) => {
                armed = None;
            }
            Either::Second(()) => {
                if let Some((_, token)) = armed.take() {
                    FACE_EVENTS.send(FaceEvent::TimerFired(token)).await;
                }
            }
        }
    }
}
