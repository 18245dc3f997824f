//! Tick scheduler
//!
//! Four periodic timers share one tick source. Each timer raises a due
//! signal once every `period` ticks; the component that owns the timer
//! consumes the signal on the next cycle.

pub mod timers;

pub use timers::{DueSignals, Scheduler, Timer, TIMER_COUNT};
