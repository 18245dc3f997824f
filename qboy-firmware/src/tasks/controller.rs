//! Main controller task
//!
//! Owns the [`Device`] and runs one cycle per tick. Requests go to the HTTP
//! task; their outcomes come back on [`REPLY_CHANNEL`] and are applied
//! between ticks. Display snapshots and output levels are published for
//! their tasks.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_sync::channel::TrySendError;

use qboy_core::actuator::ActuatorLevels;
use qboy_core::config::DeviceConfig;
use qboy_core::state::{Event, SkipReason};
use qboy_core::Device;
use qboy_protocol::ExchangeError;

use crate::channels::{ACTUATOR_LEVELS, DISPLAY_MODEL, REPLY_CHANNEL, REQUEST_CHANNEL};
use crate::tasks::link::WifiLink;
use crate::tasks::tick::TICK_SIGNAL;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(config: DeviceConfig, link: WifiLink) {
    info!("Controller task started: device {}", config.device_id.as_str());

    let mut device = Device::new(&config);
    let mut levels = ActuatorLevels::default();

    // Boot screen
    DISPLAY_MODEL.signal(device.display_model());

    loop {
        match select(TICK_SIGNAL.wait(), REPLY_CHANNEL.receive()).await {
            Either::First(now_ms) => {
                let cycle = device.tick(&link);
                trace!("Tick at {} ms: {} events", now_ms, cycle.events.len());

                for event in cycle.events.iter() {
                    log_event(&device, event);
                }

                if let Some(request) = cycle.request {
                    debug!("Starting {:?}", request.exchange);
                    if let Err(TrySendError::Full(request)) = REQUEST_CHANNEL.try_send(request) {
                        // Only reachable if the HTTP task is gone
                        warn!("HTTP task not accepting requests");
                        let event =
                            device.complete(request.exchange, Err(ExchangeError::Transport));
                        log_event(&device, &event);
                    }
                }

                if cycle.levels != levels {
                    levels = cycle.levels;
                    ACTUATOR_LEVELS.signal(levels);
                }

                if cycle.refresh {
                    DISPLAY_MODEL.signal(device.display_model());
                }
            }

            Either::Second((exchange, result)) => {
                let event = device.complete(exchange, result);
                log_event(&device, &event);
            }
        }
    }
}

/// Log an event at the level it deserves
///
/// Transitions at `info`, routine outcomes at `debug`, failures at `warn`.
fn log_event(device: &Device, event: &Event) {
    match event {
        Event::LinkUp => info!("WiFi link up"),
        Event::LinkDown => warn!("WiFi link down"),
        Event::Paired => info!(
            "Paired with order {}",
            device.pairing().order_id().unwrap_or("?")
        ),
        Event::Unpaired => info!("No order associated with this device"),
        Event::NoCall => debug!("No call"),
        Event::CallReceived { repeats } => {
            info!("Call received: {} iteration(s)", repeats);
            if let Some(session) = device.alert() {
                info!("Room {}", session.payload().room.as_str());
            }
        }
        Event::AlertIteration { remaining } => debug!("Alert: {} iteration(s) left", remaining),
        Event::AlertFinished => info!("Alert finished"),
        Event::Skipped(timer, SkipReason::UrlTooLong) => {
            warn!("{:?} skipped: request URL too long", timer)
        }
        Event::Skipped(timer, reason) => trace!("{:?} skipped: {:?}", timer, reason),
        Event::ExchangeFailed(exchange, error) => warn!("{:?} failed: {:?}", exchange, error),
    }
}
