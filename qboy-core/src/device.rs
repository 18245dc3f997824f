//! Device tick cycle
//!
//! [`Device`] owns every component and runs one cycle per tick:
//!
//! 1. Liveness check, when due
//! 2. Alert step, when alerting
//! 3. Pairing request, when due
//! 4. Call-check request, when due
//! 5. Display refresh flag, when due
//! 6. Actuator levels for this tick
//!
//! The core performs no I/O. A cycle hands back at most one [`Request`];
//! the firmware performs it and feeds the outcome to
//! [`Device::complete`]. Only one exchange is in flight at a time.
//!
//! A due signal that cannot be acted on (link down, alert running,
//! exchange in flight) is consumed and reported as [`Event::Skipped`].
//! It fires again after a full period.

use heapless::{String, Vec};
use qboy_protocol::{call_check_url, pairing_url, Exchange, ExchangeError, HttpReply, Url};

use crate::actuator::{ActuatorLevels, ActuatorSet};
use crate::alert::{AlertEngine, AlertSession};
use crate::config::{DeviceConfig, DeviceIdentity, MAX_BASE_URL_LEN};
use crate::connectivity::ConnectivityMonitor;
use crate::display::{DisplayModel, StatusText};
use crate::pairing::Pairing;
use crate::poller;
use crate::scheduler::{Scheduler, Timer};
use crate::state::{ConnectionState, Event, PairingState, SkipReason};
use crate::traits::NetworkLink;

/// Maximum events reported by one cycle
pub const MAX_CYCLE_EVENTS: usize = 8;

/// An HTTP exchange the firmware should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub exchange: Exchange,
    pub url: Url,
}

/// Outcome of one tick
#[derive(Debug, Clone, Default)]
pub struct Cycle {
    /// What happened, in order
    pub events: Vec<Event, MAX_CYCLE_EVENTS>,
    /// Exchange to start, if any
    pub request: Option<Request>,
    /// Redraw the display this tick
    pub refresh: bool,
    /// Output levels for this tick
    pub levels: ActuatorLevels,
}

impl Cycle {
    fn push(&mut self, event: Event) {
        // At most four events per cycle
        let _ = self.events.push(event);
    }
}

/// The pager
pub struct Device {
    identity: DeviceIdentity,
    base_url: String<MAX_BASE_URL_LEN>,
    scheduler: Scheduler,
    connectivity: ConnectivityMonitor,
    pairing: Pairing,
    engine: AlertEngine,
    actuators: ActuatorSet,
    status: StatusText,
    in_flight: Option<Exchange>,
}

impl Device {
    /// Create a device in its boot state: disconnected, unpaired, idle
    pub fn new(config: &DeviceConfig) -> Self {
        let timing = &config.timing;
        Self {
            identity: config.device_id.clone(),
            base_url: config.base_url.clone(),
            scheduler: Scheduler::new(timing),
            connectivity: ConnectivityMonitor::new(),
            pairing: Pairing::new(),
            engine: AlertEngine::new(timing),
            actuators: ActuatorSet::new(timing),
            status: StatusText::boot(&config.device_id),
            in_flight: None,
        }
    }

    /// Run one tick cycle
    pub fn tick<L: NetworkLink + ?Sized>(&mut self, link: &L) -> Cycle {
        self.scheduler.tick();
        let mut cycle = Cycle::default();

        if self.scheduler.due_mut().take(Timer::Liveness) {
            let alerting = self.engine.is_alerting();
            let resting = self.pairing.state().resting_text();
            if let Some(event) = self
                .connectivity
                .check_liveness(link, &mut self.status, alerting, resting)
            {
                cycle.push(event);
            }
        }

        if let Some(event) = self.engine.step(&mut self.status, &mut self.actuators) {
            cycle.push(event);
        }

        if self.scheduler.due_mut().take(Timer::Pairing) {
            match self.pairing_request() {
                Ok(request) => self.dispatch(request, &mut cycle),
                Err(reason) => cycle.push(Event::Skipped(Timer::Pairing, reason)),
            }
        }

        if self.scheduler.due_mut().take(Timer::Poll) {
            match self.poll_request() {
                Ok(request) => self.dispatch(request, &mut cycle),
                Err(reason) => cycle.push(Event::Skipped(Timer::Poll, reason)),
            }
        }

        cycle.refresh = self.scheduler.due_mut().take(Timer::Refresh);
        cycle.levels = self.actuators.advance();
        cycle
    }

    /// Feed back the outcome of the exchange started by [`tick`](Self::tick)
    pub fn complete(
        &mut self,
        exchange: Exchange,
        result: Result<HttpReply, ExchangeError>,
    ) -> Event {
        self.in_flight = None;
        match exchange {
            Exchange::Pairing => {
                self.pairing
                    .handle_reply(result, &mut self.status, &mut self.actuators)
            }
            Exchange::CallCheck => poller::handle_reply(
                result,
                &mut self.status,
                &mut self.engine,
                &mut self.actuators,
            ),
        }
    }

    /// Snapshot for the renderer
    pub fn display_model(&self) -> DisplayModel {
        DisplayModel::new(&self.status, self.pairing.state().order_label())
    }

    pub fn connection(&self) -> ConnectionState {
        self.connectivity.state()
    }

    pub fn pairing(&self) -> &PairingState {
        self.pairing.state()
    }

    pub fn is_alerting(&self) -> bool {
        self.engine.is_alerting()
    }

    pub fn alert(&self) -> Option<&AlertSession> {
        self.engine.session()
    }

    /// Exchange awaiting [`complete`](Self::complete)
    pub fn in_flight(&self) -> Option<Exchange> {
        self.in_flight
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn status(&self) -> &StatusText {
        &self.status
    }

    fn dispatch(&mut self, request: Request, cycle: &mut Cycle) {
        self.in_flight = Some(request.exchange);
        cycle.request = Some(request);
    }

    fn exchange_allowed(&self) -> Result<(), SkipReason> {
        if !self.connectivity.state().is_connected() {
            return Err(SkipReason::Disconnected);
        }
        if self.engine.is_alerting() {
            return Err(SkipReason::Alerting);
        }
        if self.in_flight.is_some() {
            return Err(SkipReason::Busy);
        }
        Ok(())
    }

    fn pairing_request(&self) -> Result<Request, SkipReason> {
        self.exchange_allowed()?;
        let url = pairing_url(&self.base_url, self.identity.as_str())
            .map_err(|_| SkipReason::UrlTooLong)?;
        Ok(Request {
            exchange: Exchange::Pairing,
            url,
        })
    }

    fn poll_request(&self) -> Result<Request, SkipReason> {
        let order = self.pairing.state().order_id().ok_or(SkipReason::Unpaired)?;
        self.exchange_allowed()?;
        let url = call_check_url(&self.base_url, self.identity.as_str(), order)
            .map_err(|_| SkipReason::UrlTooLong)?;
        Ok(Request {
            exchange: Exchange::CallCheck,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimingConfig, WifiConfig};
    use crate::display::text;

    fn config() -> DeviceConfig {
        DeviceConfig {
            device_id: DeviceIdentity::new("QB-0001").unwrap(),
            base_url: "http://host/api".try_into().unwrap(),
            wifi: WifiConfig::default(),
            timing: TimingConfig {
                tick_ms: 100,
                liveness_ticks: 2,
                pairing_ticks: 4,
                poll_ticks: 3,
                refresh_ticks: 1,
            },
        }
    }

    fn ok(body: &[u8]) -> Result<HttpReply, ExchangeError> {
        HttpReply::new(200, body)
    }

    /// Tick until a request comes out, completing nothing
    fn next_request(device: &mut Device, link: bool) -> Request {
        for _ in 0..100 {
            if let Some(request) = device.tick(&link).request {
                return request;
            }
        }
        panic!("no request issued");
    }

    /// Bring a device up and paired with order 1450
    fn paired_device() -> Device {
        let mut device = Device::new(&config());
        let request = next_request(&mut device, true);
        assert_eq!(request.exchange, Exchange::Pairing);
        device.complete(Exchange::Pairing, ok(br#"[{"id_pedido_exame": "1450"}]"#));
        device
    }

    #[test]
    fn test_boot_state() {
        let device = Device::new(&config());
        assert_eq!(device.connection(), ConnectionState::Disconnected);
        assert_eq!(device.pairing(), &PairingState::Unpaired);
        assert!(!device.is_alerting());

        let model = device.display_model();
        assert_eq!(model.link_label, "...");
        assert_eq!(model.order_label.as_str(), "N/A");
        assert_eq!(model.main_text.as_str(), text::CONNECTING);
    }

    #[test]
    fn test_link_up_then_pairing_request() {
        let mut device = Device::new(&config());

        let first = device.tick(&true);
        assert!(first.events.is_empty());
        assert!(first.refresh);

        let second = device.tick(&true);
        assert_eq!(second.events.as_slice(), &[Event::LinkUp]);
        assert_eq!(device.connection(), ConnectionState::Connected);

        device.tick(&true);
        let fourth = device.tick(&true);
        let request = fourth.request.unwrap();
        assert_eq!(request.exchange, Exchange::Pairing);
        assert_eq!(request.url.as_str(), "http://host/api/dispositivo/parear/QB-0001");
        assert_eq!(device.in_flight(), Some(Exchange::Pairing));
    }

    #[test]
    fn test_no_requests_while_disconnected() {
        let mut device = Device::new(&config());
        for _ in 0..40 {
            let cycle = device.tick(&false);
            assert!(cycle.request.is_none());
        }
        assert_eq!(device.status().main(), text::OFFLINE);
        assert_eq!(device.display_model().link_label, "X");
    }

    #[test]
    fn test_poll_skipped_while_unpaired() {
        let mut device = Device::new(&config());
        device.tick(&true);
        device.tick(&true);
        let third = device.tick(&true);
        assert!(third
            .events
            .contains(&Event::Skipped(Timer::Poll, SkipReason::Unpaired)));
    }

    #[test]
    fn test_single_exchange_in_flight() {
        let mut device = paired_device();

        let request = next_request(&mut device, true);
        // Never complete it; further due periods must not issue anything
        let mut busy = 0;
        for _ in 0..30 {
            let cycle = device.tick(&true);
            assert!(cycle.request.is_none());
            busy += cycle
                .events
                .iter()
                .filter(|e| matches!(e, Event::Skipped(_, SkipReason::Busy)))
                .count();
        }
        assert!(busy > 0);

        device.complete(request.exchange, Err(ExchangeError::Transport));
        assert_eq!(device.in_flight(), None);
        next_request(&mut device, true);
    }

    #[test]
    fn test_call_round_trip() {
        let mut device = paired_device();
        assert_eq!(device.display_model().order_label.as_str(), "1450");
        assert_eq!(device.status().main(), text::IDLE);

        let request = loop {
            let request = next_request(&mut device, true);
            if request.exchange == Exchange::CallCheck {
                break request;
            }
            device.complete(request.exchange, ok(br#"[{"id_pedido_exame": "1450"}]"#));
        };
        assert_eq!(
            request.url.as_str(),
            "http://host/api/dispositivo/checar/QB-0001&1450"
        );

        let body = br#"[{"sala": "07", "mensagem1": "Sala A", "tempo1": 1,
                         "repeticoes1": 2, "vibracao": 1}]"#;
        let event = device.complete(Exchange::CallCheck, ok(body));
        assert_eq!(event, Event::CallReceived { repeats: 2 });
        assert!(device.is_alerting());
        assert_eq!(device.display_model().main_text.as_str(), "07");
        assert_eq!(device.display_model().message.as_str(), "Sala A");

        let mut vibrations = 0;
        let mut last = false;
        let mut finished = false;
        for _ in 0..200 {
            let cycle = device.tick(&true);
            if cycle.levels.vibrator && !last {
                vibrations += 1;
            }
            last = cycle.levels.vibrator;
            if cycle.events.contains(&Event::AlertFinished) {
                finished = true;
                break;
            }
            assert!(cycle.request.is_none(), "exchange issued during alert");
        }

        assert!(finished);
        assert_eq!(vibrations, 2);
        assert!(!device.is_alerting());
        assert_eq!(device.status().main(), text::IDLE);
    }

    #[test]
    fn test_due_signal_consumed_while_alerting() {
        let mut device = paired_device();
        loop {
            let request = next_request(&mut device, true);
            if request.exchange == Exchange::CallCheck {
                break;
            }
            device.complete(request.exchange, ok(br#"[{"id_pedido_exame": "1450"}]"#));
        }
        device.complete(
            Exchange::CallCheck,
            ok(br#"[{"sala": "07", "tempo1": 10, "repeticoes1": 3}]"#),
        );

        let mut skipped = 0;
        for _ in 0..12 {
            let cycle = device.tick(&true);
            skipped += cycle
                .events
                .iter()
                .filter(|e| matches!(e, Event::Skipped(Timer::Poll, SkipReason::Alerting)))
                .count();
        }
        // Poll period 3: once per period, not once per tick
        assert_eq!(skipped, 4);
        assert!(!device.scheduler().due().is_due(Timer::Poll));
    }

    #[test]
    fn test_link_loss_during_alert_keeps_alert_text() {
        let mut device = paired_device();
        loop {
            let request = next_request(&mut device, true);
            if request.exchange == Exchange::CallCheck {
                break;
            }
            device.complete(request.exchange, ok(br#"[{"id_pedido_exame": "1450"}]"#));
        }
        device.complete(
            Exchange::CallCheck,
            ok(br#"[{"sala": "07", "tempo1": 10}]"#),
        );

        device.tick(&false);
        device.tick(&false);
        assert_eq!(device.connection(), ConnectionState::Disconnected);
        assert_eq!(device.display_model().link_label, "X");
        assert_eq!(device.display_model().main_text.as_str(), "07");
        assert!(device.is_alerting());
    }

    #[test]
    fn test_link_recovery_restores_idle_text() {
        let mut device = paired_device();
        for _ in 0..4 {
            device.tick(&false);
        }
        assert_eq!(device.status().main(), text::OFFLINE);

        // Pairing keeps failing after the link returns
        let mut recovered = false;
        for _ in 0..8 {
            let cycle = device.tick(&true);
            recovered |= cycle.events.contains(&Event::LinkUp);
            if let Some(request) = cycle.request {
                device.complete(request.exchange, Err(ExchangeError::Transport));
            }
        }
        assert!(recovered);
        assert_eq!(device.display_model().link_label, "OK");
        assert_eq!(device.status().main(), text::IDLE);
    }

    #[test]
    fn test_unpairing_stops_polling() {
        let mut device = paired_device();
        loop {
            let request = next_request(&mut device, true);
            if request.exchange == Exchange::Pairing {
                device.complete(Exchange::Pairing, ok(b"[]"));
                break;
            }
            device.complete(request.exchange, ok(b"[]"));
        }
        assert_eq!(device.pairing(), &PairingState::Unpaired);
        assert_eq!(device.status().main(), text::ASSOCIATE);

        for _ in 0..20 {
            if let Some(request) = device.tick(&true).request {
                assert_eq!(request.exchange, Exchange::Pairing);
                device.complete(Exchange::Pairing, ok(b"[]"));
            }
        }
    }
}
