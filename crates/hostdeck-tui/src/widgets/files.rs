//! Uploaded files panel: paged listing with the abbreviated page bar.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table, Widget},
};

use hostdeck_app::viewmodel::PageEntry;
use hostdeck_app::AppState;
use hostdeck_core::types::FileOrigin;

use crate::theme::styles;
use crate::widgets::{fmt_date, fmt_size};

pub struct FilesPanel<'a> {
    state: &'a AppState,
}

impl<'a> FilesPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let files = &self.state.files;

        let header = Row::new(vec!["Name", "", "Size", "Uploaded"]).style(styles::text_muted());

        let rows: Vec<Row> = files
            .page_slice()
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let origin = match file.origin {
                    Some(FileOrigin::Sdcard) => "SD",
                    _ => "",
                };
                let size = file.size.map(fmt_size).unwrap_or_else(|| "-".to_string());
                let date = file.date.and_then(fmt_date).unwrap_or_else(|| "-".to_string());

                let row = Row::new(vec![file.name.clone(), origin.to_string(), size, date]);
                if i == files.selected {
                    row.style(styles::selected())
                } else {
                    row.style(styles::text_primary())
                }
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(2),
                Constraint::Length(9),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .column_spacing(2)
        .render(area, buf);
    }

    fn page_bar(&self) -> Line<'static> {
        let files = &self.state.files;
        let mut spans = vec![Span::styled(" page ", styles::text_muted())];
        for entry in files.pages() {
            match entry {
                PageEntry::Number(i) => {
                    let style = if i == files.page {
                        styles::selected()
                    } else {
                        styles::text_secondary()
                    };
                    spans.push(Span::styled(format!(" {} ", i + 1), style));
                }
                PageEntry::Ellipsis => {
                    spans.push(Span::styled(" … ", styles::text_muted()));
                }
            }
        }
        Line::from(spans)
    }
}

impl Widget for FilesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("Files");
        let inner = block.inner(area);
        block.render(area, buf);

        if self.state.files.is_empty() {
            let mut hint = vec![Span::styled("no files uploaded  ", styles::text_muted())];
            hint.extend(styles::hint("r", "refresh"));
            Paragraph::new(Line::from(hint)).render(inner, buf);
            return;
        }

        let chunks = Layout::vertical([Constraint::Min(2), Constraint::Length(1)]).split(inner);
        self.render_table(chunks[0], buf);
        Paragraph::new(self.page_bar()).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostdeck_core::types::GcodeFile;

    fn file(name: &str) -> GcodeFile {
        GcodeFile {
            name: name.to_string(),
            origin: Some(FileOrigin::Local),
            size: Some(242_038),
            date: Some(1_700_000_000),
        }
    }

    fn render_to_text(state: &AppState) -> String {
        let area = Rect::new(0, 0, 80, 16);
        let mut buf = Buffer::empty(area);
        FilesPanel::new(state).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..16 {
            for x in 0..80 {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_listing_renders_rows_and_page_bar() {
        let mut state = AppState::new();
        state.files.set_files(vec![file("benchy.gcode"), file("calibration.gcode")]);

        let text = render_to_text(&state);
        assert!(text.contains("benchy.gcode"));
        assert!(text.contains("calibration.gcode"));
        assert!(text.contains("236.4 KB"));
        assert!(text.contains("page  1 "));
    }

    #[test]
    fn test_multi_page_listing_numbers_pages() {
        let mut state = AppState::new();
        state
            .files
            .set_files((0..25).map(|i| file(&format!("part-{i:02}.gcode"))).collect());

        let text = render_to_text(&state);
        assert!(text.contains(" 1 "));
        assert!(text.contains(" 2 "));
        assert!(text.contains(" 3 "));
        // Ten rows per page by default.
        assert!(text.contains("part-00.gcode"));
        assert!(!text.contains("part-10.gcode"));
    }

    #[test]
    fn test_sd_files_tagged() {
        let mut state = AppState::new();
        let mut sd = file("from-card.gcode");
        sd.origin = Some(FileOrigin::Sdcard);
        state.files.set_files(vec![sd]);

        let text = render_to_text(&state);
        assert!(text.contains("SD"));
    }

    #[test]
    fn test_empty_listing_placeholder() {
        let state = AppState::new();
        let text = render_to_text(&state);
        assert!(text.contains("no files uploaded"));
    }
}
