//! Weather pictograms drawn from primitives
//!
//! Every icon stays inside its `size` x `size` box. Positions below are
//! percentages of the box edge.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};

use sunshine_core::config::Rgb;
use sunshine_core::weather::WeatherIcon;

use crate::eg::to_rgb565;

const SUN: Rgb = Rgb::new(0xFF, 0xC1, 0x07);
const CLOUD: Rgb = Rgb::new(0xEC, 0xEF, 0xF1);
const STORM_CLOUD: Rgb = Rgb::new(0x78, 0x90, 0x9C);
const WATER: Rgb = Rgb::new(0x4F, 0xC3, 0xF7);
const MIST: Rgb = Rgb::new(0xB0, 0xBE, 0xC5);

#[derive(Clone, Copy)]
struct IconBox {
    origin: Point,
    size: i32,
}

impl IconBox {
    fn at(&self, x_pct: i32, y_pct: i32) -> Point {
        self.origin + Point::new(self.size * x_pct / 100, self.size * y_pct / 100)
    }

    fn len(&self, pct: i32) -> u32 {
        (self.size * pct / 100).max(1) as u32
    }
}

/// Draw `icon` with its top-left corner at `top_left`
pub fn draw<D>(target: &mut D, icon: WeatherIcon, top_left: Point, size: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let b = IconBox {
        origin: top_left,
        size: size as i32,
    };

    match icon {
        WeatherIcon::Clear => sun(target, b, (50, 50), 56),
        WeatherIcon::LightClouds => {
            sun(target, b, (38, 38), 44)?;
            cloud(target, b, 40, CLOUD)
        }
        WeatherIcon::Clouds => cloud(target, b, 30, CLOUD),
        WeatherIcon::Drizzle => {
            cloud(target, b, 15, CLOUD)?;
            for x in [32, 52, 72] {
                line(target, b, (x, 62), (x - 3, 72), WATER)?;
            }
            Ok(())
        }
        WeatherIcon::Rain => {
            cloud(target, b, 15, CLOUD)?;
            for x in [32, 52, 72] {
                line(target, b, (x, 60), (x - 6, 88), WATER)?;
            }
            Ok(())
        }
        WeatherIcon::Snow => {
            cloud(target, b, 15, CLOUD)?;
            for (x, y) in [(30, 62), (50, 70), (70, 62), (40, 82), (60, 82)] {
                dot(target, b, (x, y), 8, Rgb::WHITE)?;
            }
            Ok(())
        }
        WeatherIcon::Thunderstorm => {
            cloud(target, b, 10, STORM_CLOUD)?;
            let fill = PrimitiveStyle::with_fill(to_rgb565(SUN));
            Triangle::new(b.at(56, 46), b.at(38, 72), b.at(54, 72))
                .into_styled(fill)
                .draw(target)?;
            Triangle::new(b.at(46, 66), b.at(64, 66), b.at(42, 94))
                .into_styled(fill)
                .draw(target)
        }
        WeatherIcon::Atmosphere => {
            for y in [28, 44, 60, 76] {
                line(target, b, (15, y), (85, y), MIST)?;
            }
            Ok(())
        }
        WeatherIcon::Unknown => {
            Circle::new(b.at(15, 15), b.len(70))
                .into_styled(PrimitiveStyle::with_stroke(to_rgb565(MIST), b.len(5)))
                .draw(target)?;
            dot(target, b, (50, 50), 14, MIST)
        }
    }
}

fn sun<D>(target: &mut D, b: IconBox, center: (i32, i32), diameter: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    dot(target, b, center, diameter, SUN)
}

/// Filled circle centred at `center`
fn dot<D>(
    target: &mut D,
    b: IconBox,
    center: (i32, i32),
    diameter: i32,
    color: Rgb,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (cx, cy) = center;
    let r = diameter / 2;
    Circle::new(b.at(cx - r, cy - r), b.len(diameter))
        .into_styled(PrimitiveStyle::with_fill(to_rgb565(color)))
        .draw(target)
}

fn line<D>(
    target: &mut D,
    b: IconBox,
    from: (i32, i32),
    to: (i32, i32),
    color: Rgb,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(b.at(from.0, from.1), b.at(to.0, to.1))
        .into_styled(PrimitiveStyle::with_stroke(to_rgb565(color), b.len(5)))
        .draw(target)
}

/// Three puffs over a flat base, spanning 12–88 % across and `top` to
/// `top + 37` % down
fn cloud<D>(target: &mut D, b: IconBox, top: i32, color: Rgb) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let fill = PrimitiveStyle::with_fill(to_rgb565(color));
    Circle::new(b.at(30, top), b.len(35)).into_styled(fill).draw(target)?;
    Circle::new(b.at(12, top + 12), b.len(25)).into_styled(fill).draw(target)?;
    Circle::new(b.at(62, top + 10), b.len(26)).into_styled(fill).draw(target)?;
    Rectangle::new(b.at(22, top + 22), Size::new(b.len(60), b.len(13)))
        .into_styled(fill)
        .draw(target)
}
