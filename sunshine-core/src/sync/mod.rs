//! Data synchronization with the companion
//!
//! - `channel`: connection lifecycle, subscription, fetch-on-connect and
//!   application of decoded updates to the weather store

pub mod channel;

pub use channel::{ConnectionState, DataSyncChannel, LinkCommand, LinkEvent, Notice, SyncOutcome};
