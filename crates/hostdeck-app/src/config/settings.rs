//! Settings parser for the HostDeck config.toml

use super::types::Settings;
use hostdeck_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = "hostdeck";

const DEFAULT_CONFIG: &str = r#"# HostDeck Configuration

[server]
url = "http://localhost:5000/"
# api_key = ""              # Sent as X-Api-Key with every request

[webcam]
# stream_url = "http://localhost:8080/?action=stream"

[ui]
files_per_page = 10
temperature_max = 310.0     # Upper bound of the temperature chart, in C
"#;

/// Default config file location, e.g. `~/.config/hostdeck/config.toml`.
///
/// Returns `None` when the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from a config file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply command-line overrides on top of loaded settings.
pub fn apply_overrides(settings: &mut Settings, url: Option<String>, api_key: Option<String>) {
    if let Some(url) = url {
        settings.server.url = url;
    }
    if let Some(key) = api_key {
        settings.server.api_key = Some(key);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Init & Save
// ─────────────────────────────────────────────────────────────────────────────

/// Create the config directory and a commented default config.toml if missing.
///
/// This function is idempotent - existing files are left untouched.
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
        }
    }

    if !config_path.exists() {
        std::fs::write(config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Save settings to a config file.
///
/// Uses atomic write (temp file + rename) for safety.
pub fn save_settings(config_path: &Path, settings: &Settings) -> Result<()> {
    let parent = config_path
        .parent()
        .ok_or_else(|| Error::config("Config path has no parent directory".to_string()))?;

    if !parent.exists() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let temp_path = parent.join(".config.toml.tmp");

    let header = generate_config_header();
    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let full_content = format!("{}{}", header, content);

    // Atomic write: write to temp, then rename
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

fn generate_config_header() -> String {
    "# HostDeck Configuration\n\n".to_string()
}
