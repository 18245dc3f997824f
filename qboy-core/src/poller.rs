//! Call poller
//!
//! Asks the service whether a call is waiting for the paired order.

use qboy_protocol::{decode_call, CallReply, Exchange, ExchangeError, HttpReply};

use crate::actuator::ActuatorSet;
use crate::alert::{AlertEngine, AlertPayload};
use crate::display::{text, StatusText};
use crate::state::Event;

/// Apply the outcome of a call-check exchange
///
/// A call starts the alert engine; an empty answer restores the idle
/// screen. Failures change nothing.
pub fn handle_reply(
    result: Result<HttpReply, ExchangeError>,
    status: &mut StatusText,
    engine: &mut AlertEngine,
    actuators: &mut ActuatorSet,
) -> Event {
    let reply = match result.and_then(|r| Ok(decode_call(r.ok_body()?)?)) {
        Ok(reply) => reply,
        Err(e) => return Event::ExchangeFailed(Exchange::CallCheck, e),
    };

    match reply {
        CallReply::NoCall => {
            status.set_main(text::IDLE);
            status.set_message(text::IDLE_MESSAGE);
            Event::NoCall
        }
        CallReply::Call(call) => engine.start(AlertPayload::from(call), status, actuators),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceIdentity, TimingConfig};

    struct Rig {
        status: StatusText,
        engine: AlertEngine,
        actuators: ActuatorSet,
    }

    impl Rig {
        fn new() -> Self {
            let timing = TimingConfig::default();
            Self {
                status: StatusText::boot(&DeviceIdentity::new("QB-0001").unwrap()),
                engine: AlertEngine::new(&timing),
                actuators: ActuatorSet::new(&timing),
            }
        }

        fn reply(&mut self, result: Result<HttpReply, ExchangeError>) -> Event {
            handle_reply(result, &mut self.status, &mut self.engine, &mut self.actuators)
        }
    }

    #[test]
    fn test_no_call_restores_idle() {
        let mut rig = Rig::new();
        let event = rig.reply(HttpReply::new(200, b"[]"));

        assert_eq!(event, Event::NoCall);
        assert!(!rig.engine.is_alerting());
        assert_eq!(rig.status.main(), text::IDLE);
        assert_eq!(rig.status.message(), text::IDLE_MESSAGE);
    }

    #[test]
    fn test_call_starts_alert() {
        let mut rig = Rig::new();
        let body = br#"[{"sala": "07", "mensagem1": "Sala A", "repeticoes1": 2}]"#;
        let event = rig.reply(HttpReply::new(200, body));

        assert_eq!(event, Event::CallReceived { repeats: 2 });
        assert!(rig.engine.is_alerting());
        assert_eq!(rig.status.main(), "07");
        assert_eq!(rig.status.message(), "Sala A");
    }

    #[test]
    fn test_zero_repeat_still_alerts_once() {
        let mut rig = Rig::new();
        let event = rig.reply(HttpReply::new(200, br#"[{"sala": "03"}]"#));
        assert_eq!(event, Event::CallReceived { repeats: 1 });
    }

    #[test]
    fn test_failure_changes_nothing() {
        let mut rig = Rig::new();
        let before = rig.status.clone();

        let event = rig.reply(HttpReply::new(404, b"[]"));
        assert_eq!(
            event,
            Event::ExchangeFailed(Exchange::CallCheck, ExchangeError::Status(404))
        );

        let event = rig.reply(HttpReply::new(200, br#"{"sala": "07"}"#));
        assert!(matches!(
            event,
            Event::ExchangeFailed(Exchange::CallCheck, ExchangeError::Decode(_))
        ));

        assert_eq!(rig.status, before);
        assert!(!rig.engine.is_alerting());
    }
}
