//! Terminal panel: serial communication log and command entry.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use hostdeck_app::AppState;

use crate::theme::styles;

pub struct TerminalPanel<'a> {
    state: &'a AppState,
}

impl<'a> TerminalPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn log_lines(&self, visible: usize) -> Vec<Line<'static>> {
        let terminal = &self.state.terminal;
        let start = terminal.scroll_target(visible);
        let end = (start + visible).min(terminal.log.len());

        terminal.log[start..end]
            .iter()
            .map(|entry| {
                let style = if entry.starts_with("Send:") {
                    styles::text_primary()
                } else {
                    styles::text_secondary()
                };
                Line::from(Span::styled(entry.clone(), style))
            })
            .collect()
    }

    fn input_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled("> ", styles::accent()),
            Span::styled(self.state.terminal.input.clone(), styles::text_primary()),
            Span::styled("█", styles::text_muted()),
        ])
    }
}

impl Widget for TerminalPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.state.terminal.auto_scroll {
            "Terminal [following]"
        } else {
            "Terminal [scrolled]"
        };
        let block = styles::panel_block(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            Paragraph::new(self.input_line()).render(inner, buf);
            return;
        }

        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let visible = chunks[0].height as usize;
        Paragraph::new(self.log_lines(visible)).render(chunks[0], buf);
        Paragraph::new(self.input_line()).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_text(state: &AppState) -> String {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        TerminalPanel::new(state).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..10 {
            for x in 0..60 {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_log_follows_tail() {
        let mut state = AppState::new();
        state.terminal.log = (0..30).map(|i| format!("Recv: line {i:02}")).collect();

        let text = render_to_text(&state);
        assert!(text.contains("line 29"));
        assert!(!text.contains("line 00"));
        assert!(text.contains("[following]"));
    }

    #[test]
    fn test_scrolled_log_shows_offset_window() {
        let mut state = AppState::new();
        state.terminal.log = (0..30).map(|i| format!("Recv: line {i:02}")).collect();
        state.terminal.scroll_to_top();

        let text = render_to_text(&state);
        assert!(text.contains("line 00"));
        assert!(!text.contains("line 29"));
        assert!(text.contains("[scrolled]"));
    }

    #[test]
    fn test_input_row_renders_entry() {
        let mut state = AppState::new();
        state.terminal.input = "G28".to_string();

        let text = render_to_text(&state);
        assert!(text.contains("> G28"));
    }
}
