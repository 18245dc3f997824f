//! Display task
//!
//! Draws the latest [`DisplayModel`](qboy_core::display::DisplayModel)
//! snapshot. The controller publishes one per refresh tick; the marquee
//! advances once per drawn frame.

use defmt::*;
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::gpio::Output;
use esp_hal::spi::master::Spi;
use esp_hal::Blocking;

use qboy_display::Renderer;
use qboy_drivers::display::Pcd8544;

use crate::channels::DISPLAY_MODEL;

/// The panel as wired on the board
pub type Lcd = Pcd8544<
    ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>,
    Output<'static>,
    Output<'static>,
    Delay,
>;

/// How long the boot screen stays up before the first frame
const SPLASH_HOLD_MS: u64 = 2000;

/// Display task - the panel must already be initialized
#[embassy_executor::task]
pub async fn display_task(mut lcd: Lcd) {
    info!("Display task started");

    let mut renderer = Renderer::new();

    // Only the latest snapshot is kept while the boot screen is up
    Timer::after_millis(SPLASH_HOLD_MS).await;

    loop {
        let model = DISPLAY_MODEL.wait().await;
        if let Err(e) = renderer.render(&model, &mut lcd) {
            warn!("Display update failed: {:?}", e);
        }
    }
}
