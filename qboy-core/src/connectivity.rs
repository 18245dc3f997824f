//! Link liveness monitor

use crate::display::{text, StatusText};
use crate::state::{ConnectionState, Event};
use crate::traits::NetworkLink;

/// Tracks whether the network link is up
#[derive(Debug, Clone, Default)]
pub struct ConnectivityMonitor {
    state: ConnectionState,
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Sample the link and update the header label
    ///
    /// While the link is down the main text shows the offline notice. When
    /// it comes back the main text returns to `resting`. An alert owns the
    /// screen and is left alone. Returns an event only when the state
    /// changed.
    pub fn check_liveness<L: NetworkLink + ?Sized>(
        &mut self,
        link: &L,
        status: &mut StatusText,
        alerting: bool,
        resting: &str,
    ) -> Option<Event> {
        let previous = self.state;
        self.state = ConnectionState::from_joined(link.is_joined());
        status.set_link_label(self.state.label());

        if !self.state.is_connected() && !alerting {
            status.set_main(text::OFFLINE);
        }

        match (previous, self.state) {
            (ConnectionState::Disconnected, ConnectionState::Connected) => {
                if !alerting && status.main() == text::OFFLINE {
                    status.set_main(resting);
                }
                Some(Event::LinkUp)
            }
            (ConnectionState::Connected, ConnectionState::Disconnected) => Some(Event::LinkDown),
            _ => None,
        }
    }
}
