//! Periodic tick counters

use crate::config::TimingConfig;

/// Number of scheduler timers
pub const TIMER_COUNT: usize = 4;

/// Scheduler timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timer {
    /// Network liveness check
    Liveness,
    /// Pairing request
    Pairing,
    /// Call-check request
    Poll,
    /// Display refresh
    Refresh,
}

impl Timer {
    /// All timers in evaluation order
    pub const ALL: [Timer; TIMER_COUNT] = [Timer::Liveness, Timer::Pairing, Timer::Poll, Timer::Refresh];

    const fn index(self) -> usize {
        match self {
            Timer::Liveness => 0,
            Timer::Pairing => 1,
            Timer::Poll => 2,
            Timer::Refresh => 3,
        }
    }
}

/// Pending due signals
///
/// A signal stays raised until the consumer takes it. Raising an already
/// raised signal does not queue a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DueSignals {
    raised: [bool; TIMER_COUNT],
}

impl DueSignals {
    /// Check a signal without consuming it
    pub fn is_due(&self, timer: Timer) -> bool {
        self.raised[timer.index()]
    }

    /// Consume a signal, returning whether it was raised
    pub fn take(&mut self, timer: Timer) -> bool {
        core::mem::take(&mut self.raised[timer.index()])
    }

    fn raise(&mut self, timer: Timer) {
        self.raised[timer.index()] = true;
    }
}

/// Tick scheduler
///
/// Counters stay within `0..period`. A timer with period `P` raises its
/// signal on ticks `P, 2P, 3P, ...` counted from construction.
#[derive(Debug, Clone)]
pub struct Scheduler {
    periods: [u16; TIMER_COUNT],
    counters: [u16; TIMER_COUNT],
    due: DueSignals,
}

impl Scheduler {
    /// Create a scheduler from the timing configuration
    ///
    /// A zero period is treated as one (fire every tick).
    pub fn new(timing: &TimingConfig) -> Self {
        let periods = [
            timing.liveness_ticks,
            timing.pairing_ticks,
            timing.poll_ticks,
            timing.refresh_ticks,
        ]
        .map(|p| p.max(1));

        Self {
            periods,
            counters: [0; TIMER_COUNT],
            due: DueSignals::default(),
        }
    }

    /// Advance all counters by one tick
    pub fn tick(&mut self) {
        for timer in Timer::ALL {
            let i = timer.index();
            if self.counters[i] >= self.periods[i] - 1 {
                self.counters[i] = 0;
                self.due.raise(timer);
            } else {
                self.counters[i] += 1;
            }
        }
    }

    /// Pending due signals
    pub fn due(&self) -> &DueSignals {
        &self.due
    }

    /// Pending due signals, for consumption
    pub fn due_mut(&mut self) -> &mut DueSignals {
        &mut self.due
    }

    /// Current counter value of a timer
    pub fn counter(&self, timer: Timer) -> u16 {
        self.counters[timer.index()]
    }

    /// Period of a timer in ticks
    pub fn period(&self, timer: Timer) -> u16 {
        self.periods[timer.index()]
    }
}
