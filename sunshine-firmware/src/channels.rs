//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Everything that changes face state goes through [`FACE_EVENTS`] so the
//! face task is the only owner of the [`WatchFace`](sunshine_core::WatchFace).

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use sunshine_core::scheduler::{TickToken, TimerCommand};
use sunshine_core::sync::{LinkCommand, LinkEvent};
use sunshine_display::DrawScript;

/// Channel capacity for face events
const FACE_EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound link commands
const LINK_TX_CHANNEL_SIZE: usize = 8;

/// Platform callbacks and companion notifications for the face task
#[derive(Debug, Clone, PartialEq, Eq, defmt::Format)]
pub enum FaceEvent {
    Visibility(bool),
    Ambient(bool),
    Properties { low_bit_ambient: bool },
    Insets { round: bool },
    /// Wall-clock minute boundary
    TimeTick,
    TimerFired(TickToken),
    Link(LinkEvent),
    TimeSync { epoch_ms: u64, utc_offset_minutes: i16 },
}

/// Events for the face task
pub static FACE_EVENTS: Channel<CriticalSectionRawMutex, FaceEvent, FACE_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Redraw timer command (latest wins, an arm replaces the previous one)
pub static TIMER_CMD: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Commands for the companion link
pub static LINK_TX: Channel<CriticalSectionRawMutex, LinkCommand, LINK_TX_CHANNEL_SIZE> =
    Channel::new();

/// Draw script for the LCD (an unconsumed frame is replaced by a newer one)
pub static DRAW: Signal<CriticalSectionRawMutex, DrawScript> = Signal::new();

/// Backlight on/off
pub static BACKLIGHT: Signal<CriticalSectionRawMutex, bool> = Signal::new();
