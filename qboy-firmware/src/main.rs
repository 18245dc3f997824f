//! Qboy - Patient Pager Firmware
//!
//! Firmware binary for ESP32-C3 pagers with a PCD8544 (Nokia 5110) panel.
//! The pager joins WiFi, pairs with a work order on the dispatch service,
//! polls for calls and, when one arrives, shows the room while it beeps,
//! blinks and vibrates.
//!
//! # Wiring
//!
//! | Signal       | GPIO |
//! |--------------|------|
//! | LCD SCK      | 6    |
//! | LCD DIN      | 7    |
//! | LCD CE       | 10   |
//! | LCD DC       | 3    |
//! | LCD RST      | 2    |
//! | Backlight    | 1    |
//! | Beeper       | 4    |
//! | Vibrator     | 5    |
//! | LED (low)    | 8    |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::rng::Rng;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use static_cell::StaticCell;

use qboy_core::traits::ActuatorError;
use qboy_display::DisplayBackend;
use qboy_drivers::display::Pcd8544;
use qboy_drivers::output::{ActuatorBank, GpioOutput};

use crate::tasks::{Lcd, Outputs, WifiLink};

mod channels;
mod config;
mod tasks;

esp_bootloader_esp_idf::esp_app_desc!();

/// PCD8544 maximum serial clock is 4 MHz
const LCD_SPI_MHZ: u32 = 4;

// Static cells for the network stack (must live forever)
static WIFI_INIT: StaticCell<esp_wifi::EspWifiController<'static>> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

/// Main entry point
///
/// Every early `return` below happens before any task is spawned, which
/// leaves the device halted. Once the outputs exist they are switched off
/// first.
#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("Qboy firmware starting...");

    let p = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    // WiFi driver heap
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let tg0 = TimerGroup::new(p.TIMG0);
    esp_hal_embassy::init(tg0.timer0);
    info!("Peripherals initialized");

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration unreadable: {:?}", e);
            return;
        }
    };
    info!(
        "Device {} -> {}",
        config.device_id.as_str(),
        config.base_url.as_str()
    );

    // Outputs, backlight on from boot
    let mut outputs = match build_outputs(
        Output::new(p.GPIO4, Level::Low, OutputConfig::default()),
        Output::new(p.GPIO5, Level::Low, OutputConfig::default()),
        Output::new(p.GPIO8, Level::High, OutputConfig::default()),
        Output::new(p.GPIO1, Level::Low, OutputConfig::default()),
    ) {
        Ok(outputs) => outputs,
        Err(e) => {
            error!("Output setup failed: {:?}", e);
            return;
        }
    };
    if let Err(e) = outputs.set_backlight(true) {
        warn!("Backlight failed: {:?}", e);
    }

    // Display: a pager that cannot show anything is useless, so stop here
    let mut lcd = match build_lcd(
        p.SPI2,
        p.GPIO6,
        p.GPIO7,
        Output::new(p.GPIO10, Level::High, OutputConfig::default()),
        Output::new(p.GPIO3, Level::Low, OutputConfig::default()),
        Output::new(p.GPIO2, Level::High, OutputConfig::default()),
    ) {
        Some(lcd) => lcd,
        None => return halt(&mut outputs),
    };
    info!("Display initialized");

    if let Err(e) = lcd.show_splash(qboy_core::display::text::CONNECTING) {
        warn!("Boot screen failed: {:?}", e);
    }

    // WiFi driver and network stack
    let tg1 = TimerGroup::new(p.TIMG1);
    let mut rng = Rng::new(p.RNG);
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let wifi_init = match esp_wifi::init(tg1.timer0, rng, p.RADIO_CLK) {
        Ok(init) => WIFI_INIT.init(init),
        Err(e) => {
            error!("WiFi init failed: {:?}", e);
            return halt(&mut outputs);
        }
    };
    let (controller, interfaces) = match esp_wifi::wifi::new(wifi_init, p.WIFI) {
        Ok(wifi) => wifi,
        Err(e) => {
            error!("WiFi setup failed: {:?}", e);
            return halt(&mut outputs);
        }
    };

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::new()),
        seed,
    );
    info!("Network stack created");

    let tick_ms = config.timing.tick_ms;
    let credentials = config.wifi.clone();

    let spawned = [
        spawner.spawn(tasks::net_task(runner)),
        spawner.spawn(tasks::connection_task(controller, credentials)),
        spawner.spawn(tasks::http_task(stack)),
        spawner.spawn(tasks::display_task(lcd)),
        spawner.spawn(tasks::actuator_task(outputs)),
        spawner.spawn(tasks::controller_task(config, WifiLink::new(stack))),
        spawner.spawn(tasks::tick_task(tick_ms)),
    ];
    if spawned.iter().any(Result::is_err) {
        error!("Task spawn failed");
        return;
    }

    info!("All tasks spawned, entering main loop");
}

/// Leave the outputs dark and quiet before giving up
fn halt(outputs: &mut Outputs) {
    if let Err(e) = outputs.all_off() {
        error!("Output shutdown failed: {:?}", e);
    }
    error!("Boot halted");
}

/// Wrap the actuator pins; the LED is wired active-low
fn build_outputs(
    beeper: Output<'static>,
    vibrator: Output<'static>,
    led: Output<'static>,
    backlight: Output<'static>,
) -> Result<Outputs, ActuatorError> {
    Ok(ActuatorBank::new(
        GpioOutput::new_active_high(beeper)?,
        GpioOutput::new_active_high(vibrator)?,
        GpioOutput::new_active_low(led)?,
        GpioOutput::new_active_high(backlight)?,
    ))
}

/// Bring up the SPI bus and initialize the panel
fn build_lcd(
    spi: esp_hal::peripherals::SPI2<'static>,
    sck: esp_hal::peripherals::GPIO6<'static>,
    mosi: esp_hal::peripherals::GPIO7<'static>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
) -> Option<Lcd> {
    let spi_config = SpiConfig::default()
        .with_frequency(Rate::from_mhz(LCD_SPI_MHZ))
        .with_mode(Mode::_0);

    let bus = match Spi::new(spi, spi_config) {
        Ok(bus) => bus.with_sck(sck).with_mosi(mosi),
        Err(e) => {
            error!("SPI config rejected: {:?}", e);
            return None;
        }
    };

    let Ok(device) = ExclusiveDevice::new(bus, cs, Delay) else {
        error!("SPI chip select setup failed");
        return None;
    };

    let mut lcd = Pcd8544::new(device, dc, rst, Delay);
    if let Err(e) = lcd.init() {
        error!("Display init failed: {:?}", e);
        return None;
    }
    Some(lcd)
}
