//! Display model
//!
//! Components write status text as they change state; the renderer reads a
//! [`DisplayModel`] snapshot on every refresh.

use core::fmt::Write;

use heapless::String;
use qboy_protocol::{OrderId, MAX_MESSAGE_LEN};

use crate::config::DeviceIdentity;

/// Maximum main text length
pub const MAX_MAIN_TEXT_LEN: usize = 48;

/// Main text buffer
pub type MainText = String<MAX_MAIN_TEXT_LEN>;

/// Scrolling message buffer
pub type MessageText = String<MAX_MESSAGE_LEN>;

/// Fixed user-facing texts
pub mod text {
    /// Header label before the first liveness check
    pub const LINK_UNKNOWN: &str = "...";
    /// Main text while the link is coming up
    pub const CONNECTING: &str = "CONECTANDO";
    /// Main text while the link is down
    pub const OFFLINE: &str = "SEM WIFI";
    /// Main text while no order is assigned
    pub const ASSOCIATE: &str = "ASSOCIE O DISPOSITIVO";
    /// Main text while paired and waiting for a call
    pub const IDLE: &str = "AGUARDANDO";
    /// Scrolling message while paired and waiting for a call
    pub const IDLE_MESSAGE: &str = "AGUARDE SUA CHAMADA";
    /// Prefix of the scrolling message shown at boot
    pub const DEVICE_PREFIX: &str = "DISPOSITIVO ";
}

/// Mutable screen text shared by the components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    link_label: &'static str,
    main: MainText,
    message: MessageText,
}

impl StatusText {
    /// Boot text: connecting notice, device identity scrolling below
    pub fn boot(identity: &DeviceIdentity) -> Self {
        let mut message = MessageText::new();
        // Identity is at most 32 bytes, always fits
        let _ = write!(message, "{}{}", text::DEVICE_PREFIX, identity.as_str());

        Self {
            link_label: text::LINK_UNKNOWN,
            main: clipped(text::CONNECTING),
            message,
        }
    }

    /// Set the link label
    pub fn set_link_label(&mut self, label: &'static str) {
        self.link_label = label;
    }

    /// Replace the main text, truncating to fit
    pub fn set_main(&mut self, text: &str) {
        self.main = clipped(text);
    }

    /// Replace the scrolling message, truncating to fit
    pub fn set_message(&mut self, text: &str) {
        self.message = clipped(text);
    }

    pub fn link_label(&self) -> &'static str {
        self.link_label
    }

    pub fn main(&self) -> &str {
        &self.main
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    /// Link label (`"OK"`, `"X"`, or `"..."` before the first check)
    pub link_label: &'static str,
    /// Order label (`"N/A"` while unpaired)
    pub order_label: OrderId,
    /// Large centered text
    pub main_text: MainText,
    /// Scrolling bottom-row message
    pub message: MessageText,
}

impl DisplayModel {
    /// Snapshot the status text with the current order label
    pub fn new(status: &StatusText, order_label: &str) -> Self {
        Self {
            link_label: status.link_label,
            order_label: clipped(order_label),
            main_text: status.main.clone(),
            message: status.message.clone(),
        }
    }
}

fn clipped<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
