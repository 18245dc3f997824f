//! Alert session state machine

use super::payload::AlertPayload;
use crate::actuator::ActuatorSet;
use crate::config::TimingConfig;
use crate::display::{text, StatusText};
use crate::state::Event;

/// Message currently shown by an alert iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageSlot {
    Primary,
    Secondary,
}

/// A running alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSession {
    payload: AlertPayload,
    remaining: u16,
    slot: MessageSlot,
    slot_ticks_left: u32,
}

impl AlertSession {
    /// Payload being announced
    pub fn payload(&self) -> &AlertPayload {
        &self.payload
    }

    /// Iterations left, including the current one
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Message currently shown
    pub fn slot(&self) -> MessageSlot {
        self.slot
    }
}

/// Alert engine
///
/// Idle until [`start`](Self::start); advanced by one [`step`](Self::step)
/// per tick while a session runs.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    session: Option<AlertSession>,
    timing: TimingConfig,
}

impl AlertEngine {
    /// Create an idle engine
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            session: None,
            timing: *timing,
        }
    }

    /// Check if an alert is running
    pub fn is_alerting(&self) -> bool {
        self.session.is_some()
    }

    /// The running alert, if any
    pub fn session(&self) -> Option<&AlertSession> {
        self.session.as_ref()
    }

    /// Start announcing a call, replacing any running alert
    ///
    /// The first iteration begins immediately.
    pub fn start(
        &mut self,
        payload: AlertPayload,
        status: &mut StatusText,
        actuators: &mut ActuatorSet,
    ) -> Event {
        let repeats = payload.repeat_count.max(1);
        let mut session = AlertSession {
            payload,
            remaining: repeats,
            slot: MessageSlot::Primary,
            slot_ticks_left: 0,
        };
        self.begin_iteration(&mut session, status, actuators);
        self.session = Some(session);

        Event::CallReceived { repeats }
    }

    /// Advance the running alert by one tick
    ///
    /// Returns an event when an iteration ends.
    pub fn step(&mut self, status: &mut StatusText, actuators: &mut ActuatorSet) -> Option<Event> {
        let mut session = self.session.take()?;

        session.slot_ticks_left = session.slot_ticks_left.saturating_sub(1);
        if session.slot_ticks_left > 0 {
            self.session = Some(session);
            return None;
        }

        if session.slot == MessageSlot::Primary && !session.payload.secondary_message.is_empty() {
            session.slot = MessageSlot::Secondary;
            session.slot_ticks_left = self.seconds_to_ticks(session.payload.secondary_dwell_s);
            status.set_message(&session.payload.secondary_message);
            self.session = Some(session);
            return None;
        }

        session.remaining = session.remaining.saturating_sub(1);
        if session.remaining == 0 {
            status.set_main(text::IDLE);
            status.set_message(text::IDLE_MESSAGE);
            return Some(Event::AlertFinished);
        }

        self.begin_iteration(&mut session, status, actuators);
        let remaining = session.remaining;
        self.session = Some(session);
        Some(Event::AlertIteration { remaining })
    }

    fn begin_iteration(
        &self,
        session: &mut AlertSession,
        status: &mut StatusText,
        actuators: &mut ActuatorSet,
    ) {
        let payload = &session.payload;
        status.set_main(&payload.room);
        status.set_message(&payload.primary_message);

        let mut ticks = self.seconds_to_ticks(payload.primary_dwell_s);
        if payload.vibration_enabled {
            actuators.alert_pattern(payload.vibration_pulses);
            // Let the pattern finish before the next iteration restarts it
            ticks = ticks.max(actuators.alert_pattern_ticks(payload.vibration_pulses));
        }

        session.slot = MessageSlot::Primary;
        session.slot_ticks_left = ticks.max(1);
    }

    fn seconds_to_ticks(&self, seconds: u16) -> u32 {
        u32::from(seconds) * self.timing.ticks_per_second()
    }
}
