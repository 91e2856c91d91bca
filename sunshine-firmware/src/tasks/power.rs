//! Power policy task
//!
//! Plays the platform's power manager. The face boots visible and
//! interactive, drops to ambient after `ambient_timeout_s` without input and
//! goes dark after `sleep_timeout_s`. A button press wakes it fully.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Timer};

use sunshine_core::config::FaceConfig;

use crate::channels::{FaceEvent, BACKLIGHT, FACE_EVENTS};

/// Button debounce interval
const DEBOUNCE_MS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum PowerState {
    Interactive,
    Ambient,
    Asleep,
}

/// Power task - idle timeouts and wake button (active low)
#[embassy_executor::task]
pub async fn power_task(config: &'static FaceConfig, mut button: Input<'static>) {
    info!("Power task started");

    let ambient_after = Duration::from_secs(u64::from(config.power.ambient_timeout_s));
    let sleep_after = Duration::from_secs(u64::from(config.power.sleep_timeout_s));

    // Panel facts first, so the first visible frame uses the right layout
    send(FaceEvent::Properties {
        low_bit_ambient: config.display.low_bit_ambient,
    })
    .await;
    send(FaceEvent::Insets {
        round: config.display.round,
    })
    .await;
    BACKLIGHT.signal(true);
    send(FaceEvent::Visibility(true)).await;

    let mut state = PowerState::Interactive;
    let mut last_input = Instant::now();

    loop {
        let deadline = match state {
            PowerState::Interactive => Some(last_input + ambient_after),
            PowerState::Ambient => Some(last_input + sleep_after),
            PowerState::Asleep => None,
        };
        let idle = async move {
            match deadline {
                Some(deadline) => Timer::at(deadline).await,
                None => core::future::pending::<()>().await,
            }
        };

        let pressed = match select(button.wait_for_falling_edge(), idle).await {
            Either::First(()) => true,
            Either::Second(()) => false,
        };

        if !pressed {
            state = idle_step(state).await;
            continue;
        }

        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_low() {
            last_input = Instant::now();
            state = wake(state).await;
        }
    }
}

async fn wake(state: PowerState) -> PowerState {
    match state {
        PowerState::Interactive => {}
        PowerState::Ambient => send(FaceEvent::Ambient(false)).await,
        PowerState::Asleep => {
            BACKLIGHT.signal(true);
            send(FaceEvent::Ambient(false)).await;
            send(FaceEvent::Visibility(true)).await;
        }
    }
    if state != PowerState::Interactive {
        info!("Wake from {:?}", state);
    }
    PowerState::Interactive
}

async fn idle_step(state: PowerState) -> PowerState {
    match state {
        PowerState::Interactive => {
            info!("Idle, entering ambient");
            send(FaceEvent::Ambient(true)).await;
            PowerState::Ambient
        }
        PowerState::Ambient | PowerState::Asleep => {
            info!("Idle, going to sleep");
            send(FaceEvent::Visibility(false)).await;
            BACKLIGHT.signal(false);
            PowerState::Asleep
        }
    }
}

async fn send(event: FaceEvent) {
    FACE_EVENTS.send(event).await;
}
