//! Actuator pulse patterns
//!
//! Pulses are tick-driven state machines: starting a pattern never blocks
//! the cycle. The firmware applies [`ActuatorLevels`] to its outputs after
//! every tick.

pub mod pulse;
pub mod set;

pub use pulse::PulseTrain;
pub use set::{
    Actuator, ActuatorLevels, ActuatorSet, ALERT_PULSE_INTERVAL_MS, BEEP_INTERVAL_MS,
};
