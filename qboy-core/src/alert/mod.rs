//! Alert engine
//!
//! A received call becomes an [`AlertPayload`]; the engine runs it for
//! `repeat_count` iterations. Each iteration shows the room and primary
//! message, then the secondary message when there is one. Vibration and
//! LED pulses start at the beginning of every iteration.

pub mod engine;
pub mod payload;

pub use engine::{AlertEngine, AlertSession, MessageSlot};
pub use payload::{AlertPayload, DEFAULT_DWELL_S};
