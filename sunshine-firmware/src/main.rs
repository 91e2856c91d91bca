//! Sunshine - Weather Watch Face Firmware
//!
//! Main firmware binary for the RP2040 round-LCD watch board (GC9A01 panel).
//! The board plays the platform: it owns the wall clock, the power policy
//! and the companion link UART, and drives one [`WatchFace`] from a single
//! task.
//!
//! [`WatchFace`]: sunshine_core::WatchFace

#![no_std]
#![no_main]

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::GC9A01;
use mipidsi::options::ColorInversion;
use mipidsi::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sunshine_core::config::{parse_config, FaceConfig};

/// Embedded face configuration (compiled into firmware)
/// Edit face.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../face.toml");

/// Panel SPI clock
const LCD_SPI_HZ: u32 = 40_000_000;

mod channels;
mod clock;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

static FACE_CONFIG: StaticCell<FaceConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sunshine firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static FaceConfig = FACE_CONFIG.init(load_config());
    info!(
        "Face config: {}x{}, round={}, utc_offset={}min",
        config.display.width,
        config.display.height,
        config.display.round,
        config.clock.utc_offset_minutes
    );

    // Companion link UART
    // Pin assignments are board-specific (RP2040-LCD-1.28: TX=GPIO0, RX=GPIO1)
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // GC9A01 panel on SPI1
    // Pin assignments are board-specific (RP2040-LCD-1.28: CLK=GPIO10,
    // MOSI=GPIO11, DC=GPIO8, CS=GPIO9, RST=GPIO12, BL=GPIO25)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = LCD_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let backlight = Output::new(p.PIN_25, Level::Low);

    let spi_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let lcd = match Builder::new(GC9A01, SPIInterface::new(spi_device, dc))
        .reset_pin(rst)
        .display_size(config.display.width, config.display.height)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut Delay)
    {
        Ok(lcd) => lcd,
        Err(e) => panic!("LCD init failed: {:?}", Debug2Format(&e)),
    };

    info!("LCD initialized");

    // Wake button, active low
    // Pin assignment is board-specific (GPIO15 to ground)
    let button = Input::new(p.PIN_15, Pull::Up);

    // Spawn tasks
    spawner.spawn(tasks::face_task(config)).unwrap();
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::time_tick_task()).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::display_task(lcd, backlight)).unwrap();
    spawner.spawn(tasks::power_task(config, button)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded face.toml, falling back to built-in defaults
fn load_config() -> FaceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates face.toml, so this only happens when the
            // two validators disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default face configuration");
            FaceConfig::default()
        }
    }
}
