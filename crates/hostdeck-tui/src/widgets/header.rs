//! Header bar widget
//!
//! Shows the host state line, the running job and its progress gauge.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Widget},
};

use hostdeck_app::AppState;

use crate::theme::{palette, styles};

/// Main header: state indicator, job filename, progress gauge.
pub struct MainHeader<'a> {
    state: &'a AppState,
}

impl<'a> MainHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("").style(Style::default().bg(palette::PANEL_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        self.render_state_row(Rect { height: 1, ..inner }, buf);

        if inner.height >= 2 {
            let gauge_area = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            self.render_progress_row(gauge_area, buf);
        }
    }
}

impl MainHeader<'_> {
    fn render_state_row(&self, area: Rect, buf: &mut Buffer) {
        let flags = &self.state.flags;
        let (icon, icon_style) = styles::state_indicator(flags);

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled("HostDeck", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(flags.state_string().to_string(), styles::text_secondary()),
        ];

        let filename = self.state.printer.display_filename(flags.is_loading());
        if filename != "-" {
            let used: usize = spans.iter().map(|s| s.width()).sum();
            let available = (area.width as usize).saturating_sub(used + 4);
            spans.push(Span::styled("  ▪ ", styles::text_muted()));
            spans.push(Span::styled(
                super::truncate(&filename, available),
                styles::text_secondary(),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }

    fn render_progress_row(&self, area: Rect, buf: &mut Buffer) {
        let printer = &self.state.printer;
        let percent = printer.progress_percent();
        let line = printer.line_string();

        let label = if line == "-" {
            format!("{percent}%")
        } else {
            format!("{percent}%  line {line}")
        };

        let padded = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };
        Gauge::default()
            .percent(percent)
            .label(label)
            .gauge_style(Style::default().fg(palette::ACCENT).bg(palette::PANEL_BG))
            .render(padded, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_renders_state_string() {
        let state = AppState::new();
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);

        MainHeader::new(&state).render(area, &mut buf);

        let row: String = (0..60).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("HostDeck"));
        assert!(row.contains("Offline"));
    }
}
