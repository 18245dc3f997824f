//! Build script for qboy-firmware
//!
//! - Validates device.toml at compile time
//! - Applies WiFi credentials from the environment or a `.env` file
//! - Writes the validated config as a postcard blob for the firmware to embed
//! - Adds the esp-hal linker scripts

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use qboy_core::config::DeviceConfig;

fn main() {
    let config = load_config();
    write_config_blob(&config);
    setup_linker();
}

/// Parse, override and validate device.toml
fn load_config() -> DeviceConfig {
    println!("cargo:rerun-if-changed=device.toml");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the qboy-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let mut config: DeviceConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid device.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    apply_env_credentials(&mut config);

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    println!(
        "cargo:warning=device.toml validated: id={}, ssid={}",
        config.device_id.as_str(),
        config.wifi.ssid
    );
    config
}

/// WIFI_SSID / WIFI_PASSWORD take priority over the file
///
/// Empty variables are ignored so a half-filled `.env` cannot blank the
/// committed credentials.
fn apply_env_credentials(config: &mut DeviceConfig) {
    if Path::new(".env").exists() {
        if let Err(e) = dotenvy::dotenv() {
            println!("cargo:warning=Failed to load .env file: {}", e);
        }
    }

    if let Some(ssid) = env_value("WIFI_SSID") {
        config.wifi.ssid.clear();
        if config.wifi.ssid.push_str(&ssid).is_err() {
            panic!("WIFI_SSID is longer than {} bytes", config.wifi.ssid.capacity());
        }
    }

    if let Some(password) = env_value("WIFI_PASSWORD") {
        config.wifi.password.clear();
        if config.wifi.password.push_str(&password).is_err() {
            panic!(
                "WIFI_PASSWORD is longer than {} bytes",
                config.wifi.password.capacity()
            );
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Serialize the config for `include_bytes!`
fn write_config_blob(config: &DeviceConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let blob = postcard::to_allocvec(config).unwrap();
    fs::write(out_dir.join("device_config.bin"), blob).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn setup_linker() {
    println!("cargo:rerun-if-changed=build.rs");
    // linkall.x must stay the last linker script
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
