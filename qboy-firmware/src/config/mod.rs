//! Device configuration
//!
//! `build.rs` validates device.toml and serializes it with postcard; the
//! blob is compiled into the firmware and decoded once at boot.

use qboy_core::config::DeviceConfig;

/// Validated configuration blob written by the build script
static CONFIG_BLOB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/device_config.bin"));

/// Configuration loading errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The embedded blob does not decode
    Deserialize,
}

/// Decode the embedded configuration
pub fn load() -> Result<DeviceConfig, ConfigError> {
    postcard::from_bytes(CONFIG_BLOB).map_err(|_| ConfigError::Deserialize)
}
