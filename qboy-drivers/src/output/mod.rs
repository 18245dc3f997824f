//! Actuator outputs

pub mod bank;
pub mod gpio;

pub use bank::ActuatorBank;
pub use gpio::GpioOutput;
