//! Drawing operations produced by the renderer

use embedded_graphics::geometry::{Point, Size};
use heapless::{String, Vec};

use sunshine_core::config::Rgb;
use sunshine_core::weather::WeatherIcon;

/// Longest text a single operation carries
pub const MAX_TEXT_LEN: usize = 24;

/// Operations in one frame: background, four texts, icon
pub const MAX_OPS: usize = 8;

pub type TextBuf = String<MAX_TEXT_LEN>;

/// Which face element a text operation draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextElement {
    Time,
    HighTemperature,
    LowTemperature,
    Date,
}

/// One drawing step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawOp {
    /// Fill the whole surface
    Clear(Rgb),
    FillRect {
        top_left: Point,
        size: Size,
        color: Rgb,
    },
    /// Text with its left edge at `origin.x` and baseline at `origin.y`
    Text {
        element: TextElement,
        text: TextBuf,
        origin: Point,
        /// Pixel height
        size: u8,
        color: Rgb,
        anti_alias: bool,
    },
    /// Weather icon scaled into a `size` x `size` box
    Icon {
        icon: WeatherIcon,
        top_left: Point,
        size: u32,
    },
}

impl DrawOp {
    /// The text element this op draws, if it is a text op
    pub fn element(&self) -> Option<TextElement> {
        match self {
            DrawOp::Text { element, .. } => Some(*element),
            _ => None,
        }
    }
}

/// Ordered operations for one frame
pub type DrawScript = Vec<DrawOp, MAX_OPS>;
