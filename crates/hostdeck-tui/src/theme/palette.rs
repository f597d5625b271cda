//! Color palette for the HostDeck theme.

use ratatui::style::Color;

// --- Background ---
pub const PANEL_BG: Color = Color::Black;

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;

// --- Temperature series ---
pub const HOTEND_ACTUAL: Color = Color::Red;
pub const HOTEND_TARGET: Color = Color::LightRed;
pub const BED_ACTUAL: Color = Color::Blue;
pub const BED_TARGET: Color = Color::LightBlue;

// --- Selection ---
pub const CONTRAST_FG: Color = Color::Black;
