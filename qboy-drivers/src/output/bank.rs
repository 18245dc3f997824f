//! The pager's output set
//!
//! Applies per-tick [`ActuatorLevels`] from the core to the physical
//! outputs. Pins are written only when their level changes.

use qboy_core::actuator::ActuatorLevels;
use qboy_core::traits::{ActuatorError, ActuatorOutput};

/// Beeper, vibration motor, LED and backlight
pub struct ActuatorBank<B, V, L, K> {
    beeper: B,
    vibrator: V,
    led: L,
    backlight: K,
}

impl<B, V, L, K> ActuatorBank<B, V, L, K>
where
    B: ActuatorOutput,
    V: ActuatorOutput,
    L: ActuatorOutput,
    K: ActuatorOutput,
{
    pub fn new(beeper: B, vibrator: V, led: L, backlight: K) -> Self {
        Self {
            beeper,
            vibrator,
            led,
            backlight,
        }
    }

    /// Drive the pulse outputs to this tick's levels
    pub fn apply(&mut self, levels: ActuatorLevels) -> Result<(), ActuatorError> {
        update(&mut self.beeper, levels.beeper)?;
        update(&mut self.vibrator, levels.vibrator)?;
        update(&mut self.led, levels.led)
    }

    /// Switch the display backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), ActuatorError> {
        update(&mut self.backlight, on)
    }

    /// Drive every output inactive
    pub fn all_off(&mut self) -> Result<(), ActuatorError> {
        self.apply(ActuatorLevels::default())?;
        self.set_backlight(false)
    }

    /// Current levels of the pulse outputs
    pub fn levels(&self) -> ActuatorLevels {
        ActuatorLevels {
            beeper: self.beeper.is_active(),
            vibrator: self.vibrator.is_active(),
            led: self.led.is_active(),
        }
    }

    pub fn backlight(&self) -> bool {
        self.backlight.is_active()
    }
}

fn update<O: ActuatorOutput>(output: &mut O, active: bool) -> Result<(), ActuatorError> {
    if output.is_active() != active {
        output.set_active(active)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::gpio::tests::MockPin;
    use crate::output::GpioOutput;

    type Out = GpioOutput<MockPin>;

    fn bank() -> ActuatorBank<Out, Out, Out, Out> {
        let out = || GpioOutput::new_active_high(MockPin::new()).unwrap();
        ActuatorBank::new(out(), out(), out(), out())
    }

    #[test]
    fn test_apply_levels() {
        let mut bank = bank();
        let levels = ActuatorLevels {
            beeper: false,
            vibrator: true,
            led: true,
        };
        bank.apply(levels).unwrap();
        assert_eq!(bank.levels(), levels);

        bank.apply(ActuatorLevels::default()).unwrap();
        assert_eq!(bank.levels(), ActuatorLevels::default());
    }

    #[test]
    fn test_unchanged_level_not_rewritten() {
        let mut bank = bank();
        let levels = ActuatorLevels {
            beeper: true,
            vibrator: false,
            led: false,
        };
        bank.apply(levels).unwrap();
        bank.apply(levels).unwrap();
        bank.apply(levels).unwrap();
        // One write at construction, one for the change
        assert_eq!(bank.beeper.into_inner().writes, 2);
    }

    #[test]
    fn test_backlight() {
        let mut bank = bank();
        bank.set_backlight(true).unwrap();
        assert!(bank.backlight());

        bank.apply(ActuatorLevels {
            beeper: true,
            vibrator: true,
            led: true,
        })
        .unwrap();
        bank.all_off().unwrap();
        assert!(!bank.backlight());
        assert_eq!(bank.levels(), ActuatorLevels::default());
    }
}
