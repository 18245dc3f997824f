//! Digital actuator output trait

/// Errors driving an actuator output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// The pin driver rejected the level change
    Pin,
}

/// A named on/off output (beeper, vibration motor, LED, backlight)
///
/// Implementations handle pin polarity.
pub trait ActuatorOutput {
    /// Drive the output active or inactive
    fn set_active(&mut self, active: bool) -> Result<(), ActuatorError>;

    /// Check if the output is currently active
    fn is_active(&self) -> bool;
}
