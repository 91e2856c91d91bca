//! Watch face engine
//!
//! - `effects`: what the platform must do after each callback
//! - `engine`: the per-face state object all callbacks run against

mod effects;
mod engine;

pub use effects::{Effects, FaceNotice};
pub use engine::{FaceFrame, WatchFace};
