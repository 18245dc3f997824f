//! Single-output pulse train

/// Square pulse train on one output
///
/// Each pulse is `interval` ticks high followed by `interval` ticks low.
/// A train of `n` pulses occupies exactly `2 * n * interval` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTrain {
    pulses_left: u16,
    interval: u16,
    phase_left: u16,
    high: bool,
}

impl PulseTrain {
    /// An idle train
    pub const fn idle() -> Self {
        Self {
            pulses_left: 0,
            interval: 0,
            phase_left: 0,
            high: false,
        }
    }

    /// Start a new train, replacing any running one
    ///
    /// A count of zero stops the output.
    pub fn start(&mut self, count: u16, interval_ticks: u16) {
        let interval = interval_ticks.max(1);
        *self = Self {
            pulses_left: count,
            interval,
            phase_left: interval,
            high: count > 0,
        };
    }

    /// Check if pulses remain
    pub fn is_active(&self) -> bool {
        self.pulses_left > 0
    }

    /// Output level for this tick, then advance one tick
    pub fn advance(&mut self) -> bool {
        if self.pulses_left == 0 {
            return false;
        }

        let level = self.high;
        self.phase_left -= 1;
        if self.phase_left == 0 {
            if self.high {
                self.high = false;
            } else {
                self.pulses_left -= 1;
                self.high = self.pulses_left > 0;
            }
            self.phase_left = self.interval;
        }
        level
    }
}
