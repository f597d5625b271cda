//! Configuration types for HostDeck
//!
//! Defines:
//! - `Settings` - Global application settings
//! - `ServerSettings`, `WebcamSettings`, `UiSettings` - the sections of config.toml

use serde::{Deserialize, Serialize};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub webcam: WebcamSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Print server connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL of the print server
    #[serde(default = "default_url")]
    pub url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000/".to_string()
}

/// Webcam settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebcamSettings {
    /// MJPEG stream URL (unset = no live stream panel)
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// UI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Entries per page in the file list
    #[serde(default = "default_files_per_page")]
    pub files_per_page: usize,

    /// Upper bound of the temperature chart, in degrees Celsius
    #[serde(default = "default_temperature_max")]
    pub temperature_max: f64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            files_per_page: default_files_per_page(),
            temperature_max: default_temperature_max(),
        }
    }
}

fn default_files_per_page() -> usize {
    10
}

fn default_temperature_max() -> f64 {
    310.0
}
