//! Face lifecycle state object
//!
//! Platform callbacks and link events are all delivered to one
//! [`WatchFace`] on one execution context. Each mutator returns
//! [`Effects`]; every mode change reconciles the scheduler before returning.

use chrono::NaiveDateTime;

use crate::clock::LocalClock;
use crate::config::FaceConfig;
use crate::mode::DisplayModeState;
use crate::scheduler::{RedrawScheduler, TickOutcome, TickToken};
use crate::sync::{ConnectionState, DataSyncChannel, LinkEvent, SyncOutcome};
use crate::weather::{WeatherSnapshot, WeatherStore};

use super::effects::{Effects, FaceNotice};

/// Everything the renderer needs for one frame, captured at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceFrame {
    pub local_time: NaiveDateTime,
    pub mode: DisplayModeState,
    pub weather: WeatherSnapshot,
    pub round: bool,
}

/// One watch face instance
pub struct WatchFace<'c> {
    config: &'c FaceConfig,
    mode: DisplayModeState,
    scheduler: RedrawScheduler,
    store: WeatherStore,
    sync: DataSyncChannel,
    clock: LocalClock,
    round: bool,
    needs_draw: bool,
    destroyed: bool,
}

impl<'c> WatchFace<'c> {
    /// Create the face (platform `on_create`)
    ///
    /// Starts invisible with an empty weather store.
    pub fn new(config: &'c FaceConfig) -> Self {
        Self {
            config,
            mode: DisplayModeState::new(),
            scheduler: RedrawScheduler::default(),
            store: WeatherStore::new(),
            sync: DataSyncChannel::new(),
            clock: LocalClock::new(i32::from(config.clock.utc_offset_minutes)),
            round: config.display.round,
            needs_draw: false,
            destroyed: false,
        }
    }

    pub fn config(&self) -> &'c FaceConfig {
        self.config
    }

    pub fn mode(&self) -> &DisplayModeState {
        &self.mode
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        self.store.snapshot()
    }

    /// Bumped each time the weather snapshot changes
    pub fn weather_revision(&self) -> u32 {
        self.store.revision()
    }

    pub fn connection(&self) -> ConnectionState {
        self.sync.state()
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    pub fn is_round(&self) -> bool {
        self.round
    }

    /// A draw was requested and not yet taken
    pub fn needs_draw(&self) -> bool {
        self.needs_draw
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Tear down: cancel the tick first, then close the link
    pub fn on_destroy(&mut self) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        fx.timer = self.scheduler.shutdown();
        fx.link = self.sync.close().commands;
        self.destroyed = true;
        self.needs_draw = false;
        fx
    }

    pub fn on_visibility_changed(&mut self, visible: bool, now: u64) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        if self.mode.set_visible(visible) {
            let sync = if visible {
                self.sync.open()
            } else {
                self.sync.close()
            };
            fx.link = sync.commands;
            if visible {
                self.invalidate(&mut fx);
            } else {
                self.needs_draw = false;
            }
        }
        fx.timer = self.scheduler.reconcile(now, &self.mode);
        fx
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool, now: u64) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        if self.mode.set_ambient_mode(ambient) {
            self.invalidate(&mut fx);
        }
        fx.timer = self.scheduler.reconcile(now, &self.mode);
        fx
    }

    /// Display capabilities; only the first report counts
    pub fn on_properties_changed(&mut self, low_bit_ambient: bool, now: u64) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        self.mode.set_low_bit_ambient(low_bit_ambient);
        Effects {
            timer: self.scheduler.reconcile(now, &self.mode),
            ..Effects::none()
        }
    }

    /// Panel shape; selects the round or square layout
    pub fn on_apply_insets(&mut self, is_round: bool) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        if self.round != is_round {
            self.round = is_round;
            self.invalidate(&mut fx);
        }
        fx
    }

    /// Platform minute tick; drives redraws in ambient mode
    pub fn on_time_tick(&mut self) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        self.invalidate(&mut fx);
        fx
    }

    /// The timer armed with `token` fired
    pub fn on_timer_fired(&mut self, token: TickToken, now: u64) -> Effects {
        match self.scheduler.fire(now, token, &self.mode) {
            TickOutcome::Stale => Effects::notice(FaceNotice::StaleTick),
            TickOutcome::Redraw { rearm } => {
                let mut fx = Effects {
                    timer: rearm,
                    ..Effects::none()
                };
                self.invalidate(&mut fx);
                fx
            }
        }
    }

    pub fn on_timezone_changed(&mut self, utc_offset_minutes: i32) -> Effects {
        if self.destroyed {
            return Effects::notice(FaceNotice::Destroyed);
        }
        let mut fx = Effects::none();
        if self.clock.set_offset_minutes(utc_offset_minutes) {
            self.invalidate(&mut fx);
        }
        fx
    }

    /// Companion notification
    ///
    /// Still handled after destroy so a late connect gets disconnected.
    pub fn on_link_event(&mut self, event: LinkEvent) -> Effects {
        let SyncOutcome {
            commands,
            changed,
            notice,
        } = self.sync.handle(event, &mut self.store);

        let mut fx = Effects {
            link: commands,
            notice: notice.map(FaceNotice::Link),
            ..Effects::none()
        };
        if changed {
            self.invalidate(&mut fx);
        }
        fx
    }

    /// Capture the state to draw and clear the pending draw
    ///
    /// Returns `None` while invisible or after destroy.
    pub fn frame(&mut self, now: u64) -> Option<FaceFrame> {
        if self.destroyed || !self.mode.visible() {
            return None;
        }
        self.needs_draw = false;
        Some(FaceFrame {
            local_time: self.clock.local(now),
            mode: self.mode,
            weather: self.store.read(),
            round: self.round,
        })
    }

    fn invalidate(&mut self, fx: &mut Effects) {
        if self.destroyed || !self.mode.visible() {
            return;
        }
        self.needs_draw = true;
        fx.redraw = true;
    }
}
