//! Companion Link Protocol
//!
//! This crate defines the wire contract between the watch and the paired
//! companion device (phone). The companion owns the weather data; the watch
//! subscribes to change notifications on a logical path and pulls the current
//! record when it connects.
//!
//! # Protocol Overview
//!
//! All messages travel in a simple binary frame:
//! ```text
//! ┌──────┬────────┬──────┬─────────────┬──────────┐
//! │ SYNC │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └──────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Structured payloads (data items, paths) are `postcard`-encoded.
//! A data item is a flat key → value map published under a path such as
//! [`WEATHER_PATH`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod datamap;
pub mod frame;
pub mod messages;
pub mod weather;

pub use datamap::{DataItem, DataMap, DataValue, DecodeError, Path};
pub use frame::{Frame, FrameError, FrameParser, FRAME_SYNC, MAX_PAYLOAD_SIZE};
pub use messages::{CompanionMessage, SuspendCause, WatchMessage};
pub use weather::{UpdateKind, WeatherUpdate, WEATHER_PATH};
