//! Connection and pairing states

use qboy_protocol::OrderId;

use crate::display::text;

/// Order label shown while unpaired
pub const ORDER_LABEL_NONE: &str = "N/A";

/// Network link state as last observed by the liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Not joined (initial state)
    #[default]
    Disconnected,
    /// Joined to the configured network
    Connected,
}

impl ConnectionState {
    /// Map a raw link reading to a state
    pub fn from_joined(joined: bool) -> Self {
        if joined {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Check if network exchanges are possible
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Status label for the header row
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "OK",
            ConnectionState::Disconnected => "X",
        }
    }
}

/// Association between this device and a work order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingState {
    /// No order assigned (initial state)
    #[default]
    Unpaired,
    /// Assigned to an order
    Paired(OrderId),
}

impl PairingState {
    /// Check if an order is assigned
    pub fn is_paired(&self) -> bool {
        matches!(self, PairingState::Paired(_))
    }

    /// Main text shown when nothing else claims the screen
    pub fn resting_text(&self) -> &'static str {
        match self {
            PairingState::Paired(_) => text::IDLE,
            PairingState::Unpaired => text::CONNECTING,
        }
    }

    /// Assigned order identifier
    pub fn order_id(&self) -> Option<&str> {
        match self {
            PairingState::Paired(id) => Some(id.as_str()),
            PairingState::Unpaired => None,
        }
    }

    /// Order label for the header row
    pub fn order_label(&self) -> &str {
        self.order_id().unwrap_or(ORDER_LABEL_NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_labels() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert_eq!(ConnectionState::from_joined(true).label(), "OK");
        assert_eq!(ConnectionState::from_joined(false).label(), "X");
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
    }

    #[test]
    fn test_pairing_labels() {
        let unpaired = PairingState::default();
        assert!(!unpaired.is_paired());
        assert_eq!(unpaired.order_label(), "N/A");

        let paired = PairingState::Paired("1450".try_into().unwrap());
        assert!(paired.is_paired());
        assert_eq!(paired.order_id(), Some("1450"));
        assert_eq!(paired.order_label(), "1450");
    }

    #[test]
    fn test_resting_text() {
        assert_eq!(PairingState::Unpaired.resting_text(), text::CONNECTING);
        let paired = PairingState::Paired("1450".try_into().unwrap());
        assert_eq!(paired.resting_text(), text::IDLE);
    }
}
