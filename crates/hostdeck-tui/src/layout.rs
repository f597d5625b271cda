//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas of the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// State line and print progress
    pub header: Rect,

    /// Panel tab bar
    pub tabs: Rect,

    /// Active panel content
    pub body: Rect,

    /// Key hints for the active panel
    pub footer: Rect,
}

/// Split the screen into header, tab bar, panel body and footer.
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(4), // Header: border + state row + progress row + border
        Constraint::Length(1), // Tab bar
        Constraint::Min(3),    // Panel body
        Constraint::Length(1), // Footer hints
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        tabs: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}
