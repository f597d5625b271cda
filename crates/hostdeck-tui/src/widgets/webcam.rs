//! Webcam and timelapse panel: stream pointer, capture config and the
//! rendered clip list.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use hostdeck_app::AppState;
use hostdeck_core::types::TimelapseMode;

use crate::theme::styles;
use crate::widgets::{fmt_date, fmt_size};

pub struct WebcamPanel<'a> {
    state: &'a AppState,
    now_ms: i64,
}

impl<'a> WebcamPanel<'a> {
    pub fn new(state: &'a AppState, now_ms: i64) -> Self {
        Self { state, now_ms }
    }

    fn config_lines(&self) -> Vec<Line<'static>> {
        let webcam = &self.state.webcam;

        let stream = match webcam.stream_url(self.now_ms) {
            Some(url) => Span::styled(url, styles::text_secondary()),
            None => Span::styled(
                "not configured (webcam.stream_url in config.toml)".to_string(),
                styles::text_muted(),
            ),
        };

        let mut lines = vec![
            Line::from(vec![Span::styled("Stream    ", styles::text_muted()), stream]),
            Line::default(),
            Line::from(Span::styled("Timelapse", styles::accent_bold())),
            Line::from(vec![
                Span::styled("  Mode      ", styles::text_muted()),
                Span::styled(mode_label(webcam.mode), styles::text_primary()),
            ]),
        ];

        if webcam.mode == TimelapseMode::Timed {
            let interval = webcam
                .interval
                .map(|secs| format!("{secs}s"))
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled("  Interval  ", styles::text_muted()),
                Span::styled(interval, styles::text_primary()),
            ]));
        }

        let mut hints = vec![Span::raw("  ")];
        hints.extend(styles::hint("m", "mode"));
        hints.extend(styles::hint("+/-", "interval"));
        hints.extend(styles::hint("Enter", "save"));
        lines.push(Line::from(hints));

        lines
    }

    fn render_clips(&self, area: Rect, buf: &mut Buffer) {
        let webcam = &self.state.webcam;

        let mut header = vec![Span::styled("Rendered clips  ", styles::accent_bold())];
        header.extend(styles::hint("d", "delete"));
        header.extend(styles::hint("r", "refresh"));
        Paragraph::new(Line::from(header)).render(Rect { height: 1, ..area }, buf);

        if area.height < 2 {
            return;
        }
        let list_area = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };

        if webcam.files.is_empty() {
            Paragraph::new(Span::styled("no rendered clips", styles::text_muted()))
                .render(list_area, buf);
            return;
        }

        let items: Vec<ListItem> = webcam
            .files
            .iter()
            .map(|clip| {
                let size = clip.size.map(fmt_size).unwrap_or_else(|| "-".to_string());
                let date = clip.date.and_then(fmt_date).unwrap_or_else(|| "-".to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<32}", clip.name), styles::text_primary()),
                    Span::styled(format!("{size:>10}  "), styles::text_secondary()),
                    Span::styled(date, styles::text_muted()),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(styles::selected());
        let mut list_state = ListState::default().with_selected(Some(webcam.selected));
        StatefulWidget::render(list, list_area, buf, &mut list_state);
    }
}

impl Widget for WebcamPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("Webcam & Timelapse");
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([Constraint::Length(7), Constraint::Min(2)]).split(inner);
        Paragraph::new(self.config_lines()).render(chunks[0], buf);
        self.render_clips(chunks[1], buf);
    }
}

fn mode_label(mode: TimelapseMode) -> &'static str {
    match mode {
        TimelapseMode::Off => "off",
        TimelapseMode::Timed => "timed",
        TimelapseMode::Zchange => "on Z change",
    }
}
