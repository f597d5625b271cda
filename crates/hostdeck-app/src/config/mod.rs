//! Configuration for HostDeck
//!
//! Settings come from a `config.toml` in the user's config directory
//! (override with `--config`):
//! - `[server]` - base URL and API key of the print server
//! - `[webcam]` - MJPEG stream URL
//! - `[ui]` - file list page size, temperature chart ceiling

pub mod settings;
pub mod types;

pub use settings::{
    apply_overrides, default_config_path, init_config_file, load_settings, save_settings,
};
pub use types::{ServerSettings, Settings, UiSettings, WebcamSettings};
