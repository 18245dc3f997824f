//! The pager's pulse-driven outputs

use super::pulse::PulseTrain;
use crate::config::TimingConfig;

/// Beep on/off interval
pub const BEEP_INTERVAL_MS: u32 = 100;

/// Flash and vibration on/off interval during an alert
pub const ALERT_PULSE_INTERVAL_MS: u32 = 300;

/// Pulse-driven outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    /// Piezo beeper
    Beeper,
    /// Vibration motor
    Vibrator,
    /// Indicator LED
    Led,
}

/// Output levels for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorLevels {
    pub beeper: bool,
    pub vibrator: bool,
    pub led: bool,
}

impl ActuatorLevels {
    /// Level of one output
    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Beeper => self.beeper,
            Actuator::Vibrator => self.vibrator,
            Actuator::Led => self.led,
        }
    }
}

/// Pulse trains for all outputs
#[derive(Debug, Clone)]
pub struct ActuatorSet {
    beeper: PulseTrain,
    vibrator: PulseTrain,
    led: PulseTrain,
    timing: TimingConfig,
}

impl ActuatorSet {
    /// Create an idle set
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            beeper: PulseTrain::idle(),
            vibrator: PulseTrain::idle(),
            led: PulseTrain::idle(),
            timing: *timing,
        }
    }

    /// Short audible pulses
    pub fn beep(&mut self, count: u16) {
        let interval = self.interval_ticks(BEEP_INTERVAL_MS);
        self.beeper.start(count, interval);
    }

    /// LED flashes
    pub fn flash(&mut self, count: u16, interval_ms: u32) {
        let interval = self.interval_ticks(interval_ms);
        self.led.start(count, interval);
    }

    /// Vibration pulses
    pub fn vibrate(&mut self, count: u16, interval_ms: u32) {
        let interval = self.interval_ticks(interval_ms);
        self.vibrator.start(count, interval);
    }

    /// Combined LED flash and vibration used once per alert iteration
    pub fn alert_pattern(&mut self, count: u16) {
        self.flash(count, ALERT_PULSE_INTERVAL_MS);
        self.vibrate(count, ALERT_PULSE_INTERVAL_MS);
    }

    /// Ticks the alert pattern of `count` pulses occupies
    pub fn alert_pattern_ticks(&self, count: u16) -> u32 {
        2 * u32::from(count) * u32::from(self.interval_ticks(ALERT_PULSE_INTERVAL_MS))
    }

    /// Check if an output has pulses pending
    pub fn is_active(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Beeper => self.beeper.is_active(),
            Actuator::Vibrator => self.vibrator.is_active(),
            Actuator::Led => self.led.is_active(),
        }
    }

    /// Levels for this tick, then advance every train
    pub fn advance(&mut self) -> ActuatorLevels {
        ActuatorLevels {
            beeper: self.beeper.advance(),
            vibrator: self.vibrator.advance(),
            led: self.led.advance(),
        }
    }

    fn interval_ticks(&self, ms: u32) -> u16 {
        self.timing.ms_to_ticks(ms).min(u32::from(u16::MAX)) as u16
    }
}
