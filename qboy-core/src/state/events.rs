//! Events reported by a tick cycle
//!
//! The core never logs. Every observable change is reported as an event and
//! the firmware decides how to log it.

use qboy_protocol::{Exchange, ExchangeError};

use crate::scheduler::Timer;

/// Why a due timer did not start its exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// Link is down
    Disconnected,
    /// Call checks need an assigned order
    Unpaired,
    /// An alert is running
    Alerting,
    /// Another exchange has not completed yet
    Busy,
    /// Request URL did not fit its buffer
    UrlTooLong,
}

/// Things that happened during a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Connectivity
    /// Link came up
    LinkUp,
    /// Link went down
    LinkDown,

    // Pairing
    /// Service assigned an order to this device
    Paired,
    /// Service reported no order for this device
    Unpaired,

    // Call polling
    /// Service reported no pending call
    NoCall,
    /// A call arrived and an alert started
    CallReceived {
        /// Alert iterations to run
        repeats: u16,
    },

    // Alert engine
    /// An alert iteration finished and the next one started
    AlertIteration {
        /// Iterations left, including the one just started
        remaining: u16,
    },
    /// The last alert iteration finished
    AlertFinished,

    // Failures
    /// A due timer did not start its exchange
    Skipped(Timer, SkipReason),
    /// An exchange produced nothing usable; state is unchanged
    ExchangeFailed(Exchange, ExchangeError),
}
