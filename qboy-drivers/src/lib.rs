//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in qboy-core and qboy-display:
//!
//! - GPIO actuator outputs (beeper, vibration motor, LED, backlight)
//! - PCD8544 84x48 LCD (Nokia 5110) over SPI

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod output;
