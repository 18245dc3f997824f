//! Device state
//!
//! Connection and pairing states, and the events a tick cycle reports.

pub mod events;
pub mod machine;

pub use events::{Event, SkipReason};
pub use machine::{ConnectionState, PairingState, ORDER_LABEL_NONE};
