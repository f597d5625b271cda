//! Theme for the HostDeck panels.
//!
//! - `palette` — raw color constants
//! - `styles` — semantic style builders

pub mod palette;
pub mod styles;
