//! Inter-task communication channels
//!
//! The controller task owns the [`Device`](qboy_core::Device); every other
//! task talks to it through the statics below.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use qboy_core::actuator::ActuatorLevels;
use qboy_core::display::DisplayModel;
use qboy_core::Request;
use qboy_protocol::{Exchange, ExchangeError, HttpReply};

/// Outcome of one HTTP exchange
pub type ExchangeResult = (Exchange, Result<HttpReply, ExchangeError>);

/// The core never has more than one exchange outstanding
const EXCHANGE_CHANNEL_SIZE: usize = 1;

/// Exchanges for the HTTP task to perform
pub static REQUEST_CHANNEL: Channel<CriticalSectionRawMutex, Request, EXCHANGE_CHANNEL_SIZE> =
    Channel::new();

/// Finished exchanges, back to the controller
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, ExchangeResult, EXCHANGE_CHANNEL_SIZE> =
    Channel::new();

/// Latest display snapshot (a newer one replaces an undrawn one)
pub static DISPLAY_MODEL: Signal<CriticalSectionRawMutex, DisplayModel> = Signal::new();

/// Output levels for the current tick
pub static ACTUATOR_LEVELS: Signal<CriticalSectionRawMutex, ActuatorLevels> = Signal::new();
