//! Alert payload derived from a call record

use heapless::String;
use qboy_protocol::{CallRecord, MAX_ROOM_LEN};

use crate::display::MessageText;

/// Dwell time used when the service sends zero
pub const DEFAULT_DWELL_S: u16 = 3;

/// What to show and signal for one call
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertPayload {
    /// Room label, shown as main text
    pub room: String<MAX_ROOM_LEN>,
    /// First message
    pub primary_message: MessageText,
    /// Second message; skipped when empty
    pub secondary_message: MessageText,
    /// Seconds the primary message stays up
    pub primary_dwell_s: u16,
    /// Seconds the secondary message stays up
    pub secondary_dwell_s: u16,
    /// Iterations to run, at least one
    pub repeat_count: u16,
    /// Pulse the vibrator and LED at each iteration
    pub vibration_enabled: bool,
    /// Pulses per iteration when vibration is enabled
    pub vibration_pulses: u16,
}

impl From<CallRecord> for AlertPayload {
    fn from(call: CallRecord) -> Self {
        Self {
            room: call.room,
            primary_message: call.primary.text,
            secondary_message: call.secondary.text,
            primary_dwell_s: dwell(call.primary.duration_s),
            secondary_dwell_s: dwell(call.secondary.duration_s),
            // A call that arrived is always announced at least once
            repeat_count: call.primary.repeat.max(1),
            vibration_enabled: call.vibration_pulses > 0,
            vibration_pulses: call.vibration_pulses,
        }
    }
}

fn dwell(seconds: u16) -> u16 {
    if seconds == 0 {
        DEFAULT_DWELL_S
    } else {
        seconds
    }
}
