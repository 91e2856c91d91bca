//! Rendering for the weather watch face
//!
//! This crate provides:
//! - `FaceRenderer`: pure function from a captured face frame to a
//!   [`DrawScript`] of drawing operations
//! - `Canvas` trait plus [`execute`] to play a script onto any surface
//! - `GraphicsCanvas`: a `Canvas` over any `embedded-graphics` RGB565
//!   draw target, with matching mono-font text metrics
//!
//! # Architecture
//!
//! The renderer never touches pixels. It measures text through
//! [`TextMeasure`] and emits positioned operations, so layout can be tested
//! on the host with a fixed-width measure while the firmware plays the
//! same script onto the LCD.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod eg;
pub mod icons;
pub mod ops;
pub mod renderer;

// Re-export key types
pub use backend::{execute, Canvas, TextMeasure};
pub use eg::{font_for_size, GraphicsCanvas, MonoTextMeasure};
pub use ops::{DrawOp, DrawScript, TextElement};
pub use renderer::FaceRenderer;
