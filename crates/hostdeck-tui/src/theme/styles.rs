//! Semantic style builders for the HostDeck theme.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};

use hostdeck_app::FlagsStore;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - used for selected rows and the active tab
pub fn selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Block builder ---
pub fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_inactive())
}

// --- State indicator ---

/// Indicator for the header line.
///
/// Returns `(icon, Style)` for the current printer flags.
pub fn state_indicator(flags: &FlagsStore) -> (&'static str, Style) {
    if flags.is_printing() {
        (
            "▶",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        )
    } else if flags.is_paused() {
        (
            "●",
            Style::default()
                .fg(palette::STATUS_YELLOW)
                .add_modifier(Modifier::BOLD),
        )
    } else if flags.has_error() || flags.is_closed_or_error() {
        ("✗", Style::default().fg(palette::STATUS_RED))
    } else if flags.is_operational() {
        ("●", Style::default().fg(palette::STATUS_GREEN))
    } else {
        ("○", Style::default().fg(palette::TEXT_MUTED))
    }
}

/// `[k] Label` hint spans for the footer line.
pub fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 3] {
    [
        Span::styled(format!("[{key}]"), status_yellow()),
        Span::styled(format!(" {label}"), text_muted()),
        Span::raw("  "),
    ]
}
