//! Configuration validation
//!
//! Run by the firmware build script before the configuration is embedded,
//! so a bad `device.toml` fails the build instead of the device.

use super::types::DeviceConfig;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device identifier is empty
    EmptyDeviceId,
    /// Device identifier contains characters not allowed in a URL path
    InvalidDeviceId,
    /// Base URL does not start with `http://`
    InvalidBaseUrl,
    /// WiFi network name is empty
    EmptySsid,
    /// Tick length is zero
    ZeroTick,
    /// A timer period is zero
    ZeroPeriod,
    /// Display refresh is not faster than the liveness check
    RefreshTooSlow,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::EmptyDeviceId => "device_id must not be empty",
            ConfigError::InvalidDeviceId => {
                "device_id may only contain ASCII letters, digits, '-', '_' and '.'"
            }
            ConfigError::InvalidBaseUrl => "base_url must start with http://",
            ConfigError::EmptySsid => "wifi.ssid must not be empty",
            ConfigError::ZeroTick => "timing.tick_ms must be at least 1",
            ConfigError::ZeroPeriod => "timer periods must be at least 1 tick",
            ConfigError::RefreshTooSlow => {
                "timing.refresh_ticks must be smaller than timing.liveness_ticks"
            }
        };
        f.write_str(msg)
    }
}

impl DeviceConfig {
    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = self.device_id.as_str();
        if id.is_empty() {
            return Err(ConfigError::EmptyDeviceId);
        }
        if !id.bytes().all(is_path_safe) {
            return Err(ConfigError::InvalidDeviceId);
        }

        // TLS is not supported by the HTTP stack
        let host = self.base_url.strip_prefix("http://").unwrap_or("");
        if host.is_empty() {
            return Err(ConfigError::InvalidBaseUrl);
        }

        if self.wifi.ssid.is_empty() {
            return Err(ConfigError::EmptySsid);
        }

        let t = &self.timing;
        if t.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if [t.liveness_ticks, t.pairing_ticks, t.poll_ticks, t.refresh_ticks].contains(&0) {
            return Err(ConfigError::ZeroPeriod);
        }
        if t.refresh_ticks >= t.liveness_ticks {
            return Err(ConfigError::RefreshTooSlow);
        }

        Ok(())
    }
}

fn is_path_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.')
}
