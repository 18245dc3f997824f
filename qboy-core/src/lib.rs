//! Board-agnostic core logic for the Qboy pager firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tick scheduler with four periodic timers
//! - Connectivity monitor, pairing protocol and call poller
//! - Alert engine and actuator pulse patterns
//! - Display model
//! - Configuration types and validation
//! - Hardware abstraction traits
//!
//! Nothing here performs I/O. [`Device::tick`] runs one cycle and returns
//! the request to perform, if any; the firmware does the HTTP exchange and
//! reports back through [`Device::complete`].

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod alert;
pub mod config;
pub mod connectivity;
pub mod device;
pub mod display;
pub mod pairing;
pub mod poller;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use device::{Cycle, Device, Request, MAX_CYCLE_EVENTS};
