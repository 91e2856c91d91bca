//! Face renderer
//!
//! Turns a captured [`FaceFrame`] into a [`DrawScript`]. Holds no state
//! beyond the configuration and text metrics it was built with.

use embedded_graphics::geometry::{Point, Size};

use sunshine_core::clock::{date_text, time_text};
use sunshine_core::config::{FaceConfig, Rgb};
use sunshine_core::face::FaceFrame;

use crate::backend::TextMeasure;
use crate::ops::{DrawOp, DrawScript, TextBuf, TextElement};

/// Draw-script renderer for the face
pub struct FaceRenderer<'c, M> {
    config: &'c FaceConfig,
    measure: M,
}

impl<'c, M: TextMeasure> FaceRenderer<'c, M> {
    pub fn new(config: &'c FaceConfig, measure: M) -> Self {
        Self { config, measure }
    }

    /// Build the draw script for one frame
    ///
    /// Order: background, time, high, low, date, icon. Elements whose data
    /// is missing are left out.
    pub fn render(&self, frame: &FaceFrame) -> DrawScript {
        let display = &self.config.display;
        let theme = &self.config.theme;
        let layout = self.config.layout(frame.round);
        let center_x = i32::from(display.width) / 2;

        let mut script = DrawScript::new();

        let background = if frame.mode.ambient_mode() {
            DrawOp::Clear(Rgb::BLACK)
        } else {
            DrawOp::FillRect {
                top_left: Point::zero(),
                size: Size::new(u32::from(display.width), u32::from(display.height)),
                color: theme.background,
            }
        };
        push(&mut script, background);

        let time = time_text(&frame.local_time);
        let time_width = self.measure.text_width(&time, layout.time_text_size);
        push(
            &mut script,
            DrawOp::Text {
                element: TextElement::Time,
                text: copy(&time),
                origin: Point::new(center_x - half(time_width), layout.time_y),
                size: layout.time_text_size,
                color: theme.primary_text,
                anti_alias: frame.mode.time_anti_alias(),
            },
        );

        let temp_size = layout.temperature_text_size;
        let high = frame.weather.high_temperature.as_deref();
        let high_width = high.map_or(0, |h| self.measure.text_width(h, temp_size));

        if let Some(high) = high {
            push(
                &mut script,
                DrawOp::Text {
                    element: TextElement::HighTemperature,
                    text: copy(high),
                    origin: Point::new(center_x - half(high_width), layout.high_y),
                    size: temp_size,
                    color: theme.primary_text,
                    anti_alias: true,
                },
            );
        }

        if let Some(low) = frame.weather.low_temperature.as_deref() {
            // Centred, then pushed right by the high temperature's width
            let low_width = self.measure.text_width(low, temp_size);
            push(
                &mut script,
                DrawOp::Text {
                    element: TextElement::LowTemperature,
                    text: copy(low),
                    origin: Point::new(
                        center_x - half(low_width) + high_width as i32,
                        layout.low_y,
                    ),
                    size: temp_size,
                    color: theme.secondary_text,
                    anti_alias: true,
                },
            );
        }

        let date = date_text(&frame.local_time);
        let date_width = self.measure.text_width(&date, layout.date_text_size);
        push(
            &mut script,
            DrawOp::Text {
                element: TextElement::Date,
                text: copy(&date),
                origin: Point::new(center_x - half(date_width), layout.date_y),
                size: layout.date_text_size,
                color: theme.secondary_text,
                anti_alias: true,
            },
        );

        if let Some(icon) = frame.weather.icon() {
            push(
                &mut script,
                DrawOp::Icon {
                    icon,
                    top_left: Point::new(layout.icon_x, layout.icon_y),
                    size: self.config.icon_size(),
                },
            );
        }

        script
    }
}

fn half(width: u32) -> i32 {
    (width / 2) as i32
}

fn copy(text: &str) -> TextBuf {
    let mut out = TextBuf::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn push(script: &mut DrawScript, op: DrawOp) {
    // A frame has at most six ops
    let _ = script.push(op);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sunshine_core::mode::DisplayModeState;
    use sunshine_core::weather::{WeatherIcon, WeatherSnapshot};
    use sunshine_protocol::datamap::bounded;

    /// Every glyph is `size / 2` wide
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn text_width(&self, text: &str, size: u8) -> u32 {
            text.chars().count() as u32 * u32::from(size / 2)
        }
    }

    fn frame(h: u32, m: u32, weather: WeatherSnapshot) -> FaceFrame {
        let mut mode = DisplayModeState::new();
        mode.set_visible(true);
        FaceFrame {
            local_time: NaiveDate::from_ymd_opt(2026, 10, 21)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            mode,
            weather,
            round: true,
        }
    }

    fn snapshot(high: Option<&str>, low: Option<&str>, code: Option<i32>) -> WeatherSnapshot {
        WeatherSnapshot {
            high_temperature: high.map(|h| bounded(h).unwrap()),
            low_temperature: low.map(|l| bounded(l).unwrap()),
            condition_code: code,
        }
    }

    fn text_of(script: &DrawScript, element: TextElement) -> Option<(&str, Point)> {
        script.iter().find_map(|op| match op {
            DrawOp::Text {
                element: e,
                text,
                origin,
                ..
            } if *e == element => Some((text.as_str(), *origin)),
            _ => None,
        })
    }

    #[test]
    fn test_time_text_rendered() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);

        let script = renderer.render(&frame(14, 5, WeatherSnapshot::default()));
        assert_eq!(text_of(&script, TextElement::Time).unwrap().0, "2:05");

        let script = renderer.render(&frame(9, 0, WeatherSnapshot::default()));
        assert_eq!(text_of(&script, TextElement::Time).unwrap().0, "9:00");
    }

    #[test]
    fn test_time_is_centred() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(14, 5, WeatherSnapshot::default()));

        // "2:05" at size 20 → 4 * 10 = 40 px wide, centre 120
        let (_, origin) = text_of(&script, TextElement::Time).unwrap();
        assert_eq!(origin, Point::new(100, config.round_layout.time_y));
    }

    #[test]
    fn test_snapshot_without_code_has_no_icon() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(
            14,
            5,
            snapshot(Some("25"), Some("16"), None),
        ));

        let elements: heapless::Vec<TextElement, 8> =
            script.iter().filter_map(DrawOp::element).collect();
        assert_eq!(
            elements.as_slice(),
            &[
                TextElement::Time,
                TextElement::HighTemperature,
                TextElement::LowTemperature,
                TextElement::Date,
            ]
        );
        assert!(!script.iter().any(|op| matches!(op, DrawOp::Icon { .. })));
    }

    #[test]
    fn test_low_shifted_by_high_width() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(
            14,
            5,
            snapshot(Some("25°"), Some("16°"), None),
        ));

        // Temperature size 18 → 9 px per glyph, 3 glyphs → 27 px
        let (_, high) = text_of(&script, TextElement::HighTemperature).unwrap();
        let (_, low) = text_of(&script, TextElement::LowTemperature).unwrap();
        assert_eq!(high.x, 120 - 13);
        assert_eq!(low.x, 120 - 13 + 27);
    }

    #[test]
    fn test_low_without_high_is_centred() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(14, 5, snapshot(None, Some("16"), None)));

        assert!(text_of(&script, TextElement::HighTemperature).is_none());
        let (_, low) = text_of(&script, TextElement::LowTemperature).unwrap();
        assert_eq!(low.x, 120 - 9);
    }

    #[test]
    fn test_date_text() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(9, 0, WeatherSnapshot::default()));
        assert_eq!(
            text_of(&script, TextElement::Date).unwrap().0,
            "WED, OCT 21 2026"
        );
    }

    #[test]
    fn test_icon_scaled_and_placed() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(9, 0, snapshot(None, None, Some(200))));

        let layout = config.layout(true);
        assert_eq!(
            script.last(),
            Some(&DrawOp::Icon {
                icon: WeatherIcon::Thunderstorm,
                top_left: Point::new(layout.icon_x, layout.icon_y),
                size: 40,
            })
        );
    }

    #[test]
    fn test_unknown_code_draws_unknown_icon() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let script = renderer.render(&frame(9, 0, snapshot(None, None, Some(0))));
        assert!(script
            .iter()
            .any(|op| matches!(op, DrawOp::Icon { icon: WeatherIcon::Unknown, .. })));
    }

    #[test]
    fn test_background_by_mode() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);

        let interactive = frame(9, 0, WeatherSnapshot::default());
        assert_eq!(
            renderer.render(&interactive)[0],
            DrawOp::FillRect {
                top_left: Point::zero(),
                size: Size::new(240, 240),
                color: config.theme.background,
            }
        );

        let mut ambient = frame(9, 0, WeatherSnapshot::default());
        ambient.mode.set_ambient_mode(true);
        assert_eq!(renderer.render(&ambient)[0], DrawOp::Clear(Rgb::BLACK));
    }

    #[test]
    fn test_time_anti_alias_follows_mode() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let mut f = frame(9, 0, WeatherSnapshot::default());
        f.mode.set_low_bit_ambient(true);

        let aa = |script: &DrawScript| {
            script.iter().find_map(|op| match op {
                DrawOp::Text {
                    element: TextElement::Time,
                    anti_alias,
                    ..
                } => Some(*anti_alias),
                _ => None,
            })
        };

        assert_eq!(aa(&renderer.render(&f)), Some(true));
        f.mode.set_ambient_mode(true);
        assert_eq!(aa(&renderer.render(&f)), Some(false));
    }

    #[test]
    fn test_square_layout() {
        let config = FaceConfig::default();
        let renderer = FaceRenderer::new(&config, FixedMeasure);
        let mut f = frame(9, 0, WeatherSnapshot::default());
        f.round = false;

        let (_, origin) = text_of(&renderer.render(&f), TextElement::Time).unwrap();
        assert_eq!(origin.y, config.square_layout.time_y);
    }
}
