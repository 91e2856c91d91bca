//! Face task
//!
//! Owns the [`WatchFace`] and the renderer. Applies every event in arrival
//! order, forwards the resulting effects to the timer, link and display
//! tasks, and renders once the event queue has drained.

use defmt::*;

use sunshine_core::config::FaceConfig;
use sunshine_core::face::{Effects, FaceNotice};
use sunshine_core::sync::Notice;
use sunshine_core::WatchFace;
use sunshine_display::{FaceRenderer, MonoTextMeasure};

use crate::channels::{FaceEvent, DRAW, FACE_EVENTS, LINK_TX, TIMER_CMD};
use crate::clock;

/// Face task - single owner of face state
#[embassy_executor::task]
pub async fn face_task(config: &'static FaceConfig) {
    info!("Face task started");

    let mut face = WatchFace::new(config);
    let renderer = FaceRenderer::new(config, MonoTextMeasure);

    loop {
        let event = FACE_EVENTS.receive().await;
        debug!("Face event: {:?}", event);

        let effects = dispatch(&mut face, event);
        apply(effects).await;

        // Coalesce: several invalidations in a burst produce one frame
        if face.needs_draw() && FACE_EVENTS.is_empty() {
            if let Some(frame) = face.frame(clock::now_ms()) {
                let script = renderer.render(&frame);
                trace!("Frame: {} ops", script.len());
                DRAW.signal(script);
            }
        }
    }
}

fn dispatch(face: &mut WatchFace<'static>, event: FaceEvent) -> Effects {
    let now = clock::now_ms();
    match event {
        FaceEvent::Visibility(visible) => {
            info!("Visible: {}", visible);
            face.on_visibility_changed(visible, now)
        }
        FaceEvent::Ambient(ambient) => {
            info!("Ambient: {}", ambient);
            face.on_ambient_mode_changed(ambient, now)
        }
        FaceEvent::Properties { low_bit_ambient } => {
            face.on_properties_changed(low_bit_ambient, now)
        }
        FaceEvent::Insets { round } => face.on_apply_insets(round),
        FaceEvent::TimeTick => face.on_time_tick(),
        FaceEvent::TimerFired(token) => face.on_timer_fired(token, now),
        FaceEvent::Link(event) => {
            let effects = face.on_link_event(event);
            debug!("Link state: {:?}", face.connection());
            if effects.redraw {
                info!(
                    "Weather rev {}: {:?}",
                    face.weather_revision(),
                    face.weather()
                );
            }
            effects
        }
        FaceEvent::TimeSync {
            epoch_ms,
            utc_offset_minutes,
        } => {
            info!("Time sync: {} ms, offset {} min", epoch_ms, utc_offset_minutes);
            clock::set_now_ms(epoch_ms);
            let mut effects = face.on_timezone_changed(i32::from(utc_offset_minutes));
            // The wall clock jumped even if the zone did not
            effects.redraw |= face.on_time_tick().redraw;
            effects
        }
    }
}

/// Hand effects to the other tasks: timer, link commands, then redraw
async fn apply(effects: Effects) {
    if let Some(notice) = effects.notice {
        log_notice(notice);
    }

    if let Some(cmd) = effects.timer {
        trace!("Timer: {:?}", cmd);
        TIMER_CMD.signal(cmd);
    }

    for cmd in effects.link {
        debug!("Link command: {:?}", cmd);
        LINK_TX.send(cmd).await;
    }
}

fn log_notice(notice: FaceNotice) {
    match notice {
        FaceNotice::StaleTick => trace!("Stale tick ignored"),
        FaceNotice::Destroyed => warn!("Event after destroy ignored"),
        FaceNotice::Link(notice) => match notice {
            Notice::DroppedPayload(e) => warn!("Dropped weather payload: {:?}", e),
            Notice::ConnectFailed => warn!("Companion connection failed"),
            Notice::Suspended(cause) => warn!("Companion connection suspended: {:?}", cause),
            Notice::StaleFetch => warn!("Stale fetch result discarded"),
            Notice::LateConnect => warn!("Late connect after close, disconnecting"),
            other => debug!("Link notice: {:?}", other),
        },
    }
}
