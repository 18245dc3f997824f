//! Actuator task
//!
//! Applies the output levels computed by each tick. Pulse timing lives in
//! the core; this task only writes pins.

use defmt::*;
use esp_hal::gpio::Output;

use qboy_drivers::output::{ActuatorBank, GpioOutput};

use crate::channels::ACTUATOR_LEVELS;

/// Beeper, vibration motor, LED and backlight
pub type Outputs = ActuatorBank<
    GpioOutput<Output<'static>>,
    GpioOutput<Output<'static>>,
    GpioOutput<Output<'static>>,
    GpioOutput<Output<'static>>,
>;

#[embassy_executor::task]
pub async fn actuator_task(mut outputs: Outputs) {
    info!("Actuator task started");

    loop {
        let levels = ACTUATOR_LEVELS.wait().await;
        trace!("Levels: {:?}", levels);
        if let Err(e) = outputs.apply(levels) {
            warn!("Actuator write failed: {:?}", e);
        }
    }
}
