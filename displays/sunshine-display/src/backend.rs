//! Canvas trait
//!
//! Defines the interface the draw script is played onto.

use embedded_graphics::geometry::{Point, Size};

use sunshine_core::config::Rgb;
use sunshine_core::weather::WeatherIcon;

use crate::ops::DrawOp;

/// Text metrics for the fonts a canvas draws with
pub trait TextMeasure {
    /// Advance width of `text` at pixel height `size`
    fn text_width(&self, text: &str, size: u8) -> u32;
}

/// Drawing surface
///
/// Implementations handle the specifics of the panel or frame buffer.
pub trait Canvas {
    type Error;

    /// Fill the entire surface
    fn clear(&mut self, color: Rgb) -> Result<(), Self::Error>;

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb) -> Result<(), Self::Error>;

    /// Draw text with its baseline at `origin.y`
    ///
    /// With `anti_alias` false only fully-on or fully-off pixels may be used.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: u8,
        color: Rgb,
        anti_alias: bool,
    ) -> Result<(), Self::Error>;

    fn draw_icon(&mut self, icon: WeatherIcon, top_left: Point, size: u32)
        -> Result<(), Self::Error>;
}

/// Play `script` onto `canvas` in order
pub fn execute<C: Canvas>(script: &[DrawOp], canvas: &mut C) -> Result<(), C::Error> {
    for op in script {
        match op {
            DrawOp::Clear(color) => canvas.clear(*color)?,
            DrawOp::FillRect {
                top_left,
                size,
                color,
            } => canvas.fill_rect(*top_left, *size, *color)?,
            DrawOp::Text {
                text,
                origin,
                size,
                color,
                anti_alias,
                ..
            } => canvas.draw_text(text, *origin, *size, *color, *anti_alias)?,
            DrawOp::Icon {
                icon,
                top_left,
                size,
            } => canvas.draw_icon(*icon, *top_left, *size)?,
        }
    }
    Ok(())
}
