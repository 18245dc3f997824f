//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware build script reads
//! `device.toml`, validates it and embeds it as postcard binary data.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::ConfigError;
