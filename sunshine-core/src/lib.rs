//! Board-agnostic logic for the weather watch face
//!
//! This crate contains everything that does not depend on a specific board
//! or display driver:
//!
//! - Display mode state (visibility, ambient, low-bit capability)
//! - Redraw scheduler with invalidatable tick tokens
//! - Weather snapshot store and condition-code table
//! - Data sync channel toward the companion
//! - The face engine that serializes platform and link events
//! - Local clock formatting and face configuration
//!
//! Nothing here logs. Operations return typed outcomes so the caller can.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod face;
pub mod mode;
pub mod scheduler;
pub mod sync;
pub mod weather;

pub use face::{Effects, FaceFrame, WatchFace};
pub use mode::DisplayModeState;
