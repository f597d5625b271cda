//! Panel widgets, one per tab, plus the shared chrome.

mod connection;
mod controls;
mod files;
mod gcode;
mod header;
mod offline;
mod tab_bar;
mod temperature;
mod terminal;
mod webcam;

pub use connection::ConnectionPanel;
pub use controls::ControlsPanel;
pub use files::FilesPanel;
pub use gcode::GcodePanel;
pub use header::MainHeader;
pub use offline::OfflineOverlay;
pub use tab_bar::TabBar;
pub use temperature::TemperaturePanel;
pub use terminal::TerminalPanel;
pub use webcam::WebcamPanel;

use chrono::{DateTime, Local};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate `text` to at most `max_width` display columns, ellipsized.
///
/// Width-aware so wide characters in filenames don't overrun the cell.
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Human-readable file size, base 1024 with one decimal above a kibibyte.
pub(crate) fn fmt_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Local date and time for a unix timestamp in seconds.
pub(crate) fn fmt_date(timestamp: i64) -> Option<String> {
    let date = DateTime::from_timestamp(timestamp, 0)?;
    Some(date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
}
