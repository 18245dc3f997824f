//! Pairing protocol
//!
//! Asks the service which work order this device belongs to. The answer
//! replaces the pairing state wholesale, so an order can be reassigned or
//! withdrawn at any time.

use qboy_protocol::{decode_pairing, Exchange, ExchangeError, HttpReply, PairingReply};

use crate::actuator::ActuatorSet;
use crate::display::{text, StatusText};
use crate::state::{Event, PairingState};

/// Owner of the pairing state
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    state: PairingState,
}

impl Pairing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PairingState {
        &self.state
    }

    /// Apply the outcome of a pairing exchange
    ///
    /// Failures leave the state untouched; the exchange is retried on the
    /// next period.
    pub fn handle_reply(
        &mut self,
        result: Result<HttpReply, ExchangeError>,
        status: &mut StatusText,
        actuators: &mut ActuatorSet,
    ) -> Event {
        let reply = match result.and_then(|r| Ok(decode_pairing(r.ok_body()?)?)) {
            Ok(reply) => reply,
            Err(e) => return Event::ExchangeFailed(Exchange::Pairing, e),
        };

        match reply {
            PairingReply::Assigned(order) => {
                self.state = PairingState::Paired(order);
                status.set_main(text::IDLE);
                Event::Paired
            }
            PairingReply::Unassigned => {
                self.state = PairingState::Unpaired;
                status.set_main(text::ASSOCIATE);
                actuators.beep(1);
                Event::Unpaired
            }
        }
    }
}
