use std::path::Path;

use serde::Deserialize;

use crate::{Result, Variant};

/// Serial device the lightsaber controller shows up as.
pub const DEFAULT_PORT: &str = "/dev/cu.usbserial-0001";
/// Baud rate the firmware opens its UART with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Top-level configuration structure for the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub variant: Variant,
}

impl AppConfig {
    /// Loads a JSON configuration file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Connection settings for the serial link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}
