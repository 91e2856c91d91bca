//! `embedded-graphics` canvas
//!
//! Plays draw scripts onto any RGB565 [`DrawTarget`], such as a `mipidsi`
//! panel or an in-memory frame buffer. Text uses the ISO-8859-1 mono fonts
//! so the degree sign in temperatures renders.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10, FONT_8X13, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use sunshine_core::config::Rgb;
use sunshine_core::weather::WeatherIcon;

use crate::backend::{Canvas, TextMeasure};
use crate::icons;

/// Largest mono font not taller than `size`, or the smallest one
pub fn font_for_size(size: u8) -> &'static MonoFont<'static> {
    match size {
        0..=12 => &FONT_6X10,
        13..=17 => &FONT_8X13,
        18..=19 => &FONT_9X18,
        _ => &FONT_10X20,
    }
}

pub(crate) fn to_rgb565(color: Rgb) -> Rgb565 {
    Rgb888::new(color.r, color.g, color.b).into()
}

/// Snap to black or white for panels without grey levels
fn to_one_bit(color: Rgb) -> Rgb {
    // Rec. 601 luma, integer weights
    let luma = (299 * u32::from(color.r) + 587 * u32::from(color.g) + 114 * u32::from(color.b)) / 1000;
    if luma >= 128 {
        Rgb::WHITE
    } else {
        Rgb::BLACK
    }
}

/// Text metrics matching [`GraphicsCanvas`] fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoTextMeasure;

impl TextMeasure for MonoTextMeasure {
    fn text_width(&self, text: &str, size: u8) -> u32 {
        let font = font_for_size(size);
        let glyphs = text.chars().count() as u32;
        if glyphs == 0 {
            return 0;
        }
        glyphs * font.character_size.width + (glyphs - 1) * font.character_spacing
    }
}

/// [`Canvas`] over an `embedded-graphics` draw target
pub struct GraphicsCanvas<'d, D> {
    target: &'d mut D,
}

impl<'d, D> GraphicsCanvas<'d, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'d mut D) -> Self {
        Self { target }
    }
}

impl<D> Canvas for GraphicsCanvas<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn clear(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.target.clear(to_rgb565(color))
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb) -> Result<(), Self::Error> {
        Rectangle::new(top_left, size)
            .into_styled(PrimitiveStyle::with_fill(to_rgb565(color)))
            .draw(self.target)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: u8,
        color: Rgb,
        anti_alias: bool,
    ) -> Result<(), Self::Error> {
        // Mono fonts have no coverage levels; aliased text is limited to
        // pure black and white instead
        let color = if anti_alias { color } else { to_one_bit(color) };
        let style = MonoTextStyle::new(font_for_size(size), to_rgb565(color));
        Text::with_baseline(text, origin, style, Baseline::Alphabetic).draw(self.target)?;
        Ok(())
    }

    fn draw_icon(
        &mut self,
        icon: WeatherIcon,
        top_left: Point,
        size: u32,
    ) -> Result<(), Self::Error> {
        icons::draw(self.target, icon, top_left, size)
    }
}
