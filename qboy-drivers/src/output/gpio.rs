//! GPIO actuator output
//!
//! Drives a beeper, vibration motor, LED or backlight directly or through
//! a transistor.

use embedded_hal::digital::OutputPin;
use qboy_core::traits::{ActuatorError, ActuatorOutput};

/// GPIO actuator output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioOutput<P> {
    pin: P,
    /// If true, output active = pin LOW
    inverted: bool,
    /// Current logical state
    active: bool,
}

impl<P: OutputPin> GpioOutput<P> {
    /// Create a new output, driven inactive
    ///
    /// - `inverted`: output is active when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Result<Self, ActuatorError> {
        let mut output = Self {
            pin,
            inverted,
            active: false,
        };
        output.set_active(false)?;
        Ok(output)
    }

    pub fn new_active_high(pin: P) -> Result<Self, ActuatorError> {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Result<Self, ActuatorError> {
        Self::new(pin, true)
    }

    /// Release the pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ActuatorOutput for GpioOutput<P> {
    fn set_active(&mut self, active: bool) -> Result<(), ActuatorError> {
        let result = if active != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::Pin)?;
        self.active = active;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin counting level writes
    pub struct MockPin {
        pub high: bool,
        pub writes: u32,
    }

    impl MockPin {
        pub fn new() -> Self {
            Self {
                high: false,
                writes: 0,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    /// Pin whose driver always fails
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = embedded_hal::digital::ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }

    #[test]
    fn test_active_high_output() {
        let mut output = GpioOutput::new_active_high(MockPin::new()).unwrap();

        // Initially inactive
        assert!(!output.is_active());
        assert!(!output.pin.high);

        output.set_active(true).unwrap();
        assert!(output.is_active());
        assert!(output.pin.high);

        output.set_active(false).unwrap();
        assert!(!output.is_active());
        assert!(!output.pin.high);
    }

    #[test]
    fn test_active_low_output() {
        let mut output = GpioOutput::new_active_low(MockPin::new()).unwrap();

        // Inactive means pin high
        assert!(!output.is_active());
        assert!(output.pin.high);

        output.set_active(true).unwrap();
        assert!(output.is_active());
        assert!(!output.pin.high);
    }

    #[test]
    fn test_pin_error() {
        assert!(matches!(
            GpioOutput::new_active_high(BrokenPin),
            Err(ActuatorError::Pin)
        ));
    }
}
