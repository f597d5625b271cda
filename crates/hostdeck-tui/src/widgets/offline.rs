//! Offline overlay, drawn over everything while the push channel is down.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use hostdeck_app::OfflineNotice;

use crate::theme::{palette, styles};

pub struct OfflineOverlay {
    notice: OfflineNotice,
}

impl OfflineOverlay {
    pub fn new(notice: OfflineNotice) -> Self {
        Self { notice }
    }
}

impl Widget for OfflineOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect(52, 7, area);
        Clear.render(modal, buf);

        let block = Block::default()
            .title(" Offline ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette::STATUS_RED))
            .style(Style::default().bg(palette::PANEL_BG));
        let inner = block.inner(modal);
        block.render(modal, buf);

        let mut hints = vec![Span::raw(" ")];
        hints.extend(styles::hint("r", "reconnect"));
        hints.extend(styles::hint("q", "quit"));

        let text = vec![
            Line::default(),
            Line::from(Span::styled(self.notice.message(), styles::text_primary())),
            Line::default(),
            Line::from(hints),
        ];
        Paragraph::new(text).wrap(Wrap { trim: false }).render(inner, buf);
    }
}

/// Center a fixed-size rect within an area, clamped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
