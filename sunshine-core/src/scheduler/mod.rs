//! Redraw scheduling
//!
//! - `tick`: single-slot interactive tick with invalidatable tokens

pub mod tick;

pub use tick::{
    next_aligned, RedrawScheduler, TickOutcome, TickState, TickToken, TimerCommand,
    INTERACTIVE_INTERVAL_MS,
};
