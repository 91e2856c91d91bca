//! LCD task
//!
//! Executes draw scripts on the GC9A01 panel and switches the backlight.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use display_interface_spi::SPIInterface;
use mipidsi::models::GC9A01;

use sunshine_display::{execute, GraphicsCanvas};

use crate::channels::{BACKLIGHT, DRAW};

/// SPI device for the panel (exclusive bus, CS managed by the device)
pub type LcdSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;

/// Initialized panel driver
pub type Lcd = mipidsi::Display<SPIInterface<LcdSpi, Output<'static>>, GC9A01, Output<'static>>;

/// Display task - owns the panel and the backlight pin
#[embassy_executor::task]
pub async fn display_task(mut lcd: Lcd, mut backlight: Output<'static>) {
    info!("Display task started");

    loop {
        match select(DRAW.wait(), BACKLIGHT.wait()).await {
            Either::First(script) => {
                let mut canvas = GraphicsCanvas::new(&mut lcd);
                match execute(&script, &mut canvas) {
                    Ok(()) => trace!("Drew {} ops", script.len()),
                    Err(e) => warn!("Draw failed: {:?}", Debug2Format(&e)),
                }
            }
            Either::Second(on) => {
                debug!("Backlight: {}", on);
                if on {
                    backlight.set_high();
                } else {
                    backlight.set_low();
                }
            }
        }
    }
}
