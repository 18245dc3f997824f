//! Configuration type definitions

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum device identifier length
pub const MAX_DEVICE_ID_LEN: usize = 32;

/// Maximum service base URL length
pub const MAX_BASE_URL_LEN: usize = 96;

/// Maximum WiFi SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WiFi passphrase length (WPA2 limit)
pub const MAX_PASSWORD_LEN: usize = 64;

/// Device identity, fixed at build time
///
/// Used verbatim as a path segment in every request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DeviceIdentity(String<MAX_DEVICE_ID_LEN>);

impl DeviceIdentity {
    /// Create an identity from text
    ///
    /// Returns `None` if the text does not fit. Character checks happen in
    /// [`DeviceConfig::validate`].
    pub fn new(id: &str) -> Option<Self> {
        String::try_from(id).ok().map(Self)
    }

    /// Identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// WiFi credentials
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WifiConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// Passphrase (empty for open networks)
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Tick length and timer periods
///
/// All periods are counted in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Tick length in milliseconds
    pub tick_ms: u32,
    /// Link liveness check period
    pub liveness_ticks: u16,
    /// Pairing request period
    pub pairing_ticks: u16,
    /// Call-check request period
    pub poll_ticks: u16,
    /// Display refresh period
    pub refresh_ticks: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            liveness_ticks: 10,
            pairing_ticks: 50,
            poll_ticks: 30,
            refresh_ticks: 3,
        }
    }
}

impl TimingConfig {
    /// Convert a duration in milliseconds to whole ticks, rounding up
    ///
    /// Never returns less than one tick.
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        let tick = self.tick_ms.max(1);
        ms.div_ceil(tick).max(1)
    }

    /// Number of ticks in one second
    pub fn ticks_per_second(&self) -> u32 {
        self.ms_to_ticks(1000)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Identity sent with every request
    pub device_id: DeviceIdentity,
    /// Dispatch service base URL
    pub base_url: String<MAX_BASE_URL_LEN>,
    /// WiFi credentials
    pub wifi: WifiConfig,
    /// Timer configuration
    #[cfg_attr(feature = "serde", serde(default))]
    pub timing: TimingConfig,
}
