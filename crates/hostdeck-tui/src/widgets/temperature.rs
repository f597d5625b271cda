//! Temperature panel: readouts, target entry and the history chart.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};

use hostdeck_app::viewmodel::{axis_label, TempTarget};
use hostdeck_app::AppState;
use hostdeck_core::types::TempPoint;

use crate::theme::{palette, styles};

/// Window shown when the series is still empty, in milliseconds.
const EMPTY_WINDOW_MS: i64 = 300_000;

pub struct TemperaturePanel<'a> {
    state: &'a AppState,
    now_ms: i64,
}

impl<'a> TemperaturePanel<'a> {
    pub fn new(state: &'a AppState, now_ms: i64) -> Self {
        Self { state, now_ms }
    }

    fn readout_lines(&self) -> Vec<Line<'static>> {
        let temp = &self.state.temperature;

        let input_style = |target: TempTarget| {
            if temp.focus == target {
                styles::selected()
            } else {
                styles::text_primary()
            }
        };

        vec![
            Line::from(vec![
                Span::styled("  Hotend  ", Style::default().fg(palette::HOTEND_ACTUAL)),
                Span::styled(
                    format!("{:>10}", temp.temp_string()),
                    styles::text_primary(),
                ),
                Span::styled("  target ", styles::text_muted()),
                Span::styled(
                    format!("{:>10}", temp.target_string()),
                    styles::text_secondary(),
                ),
                Span::styled("   set ", styles::text_muted()),
                Span::styled(
                    format!("[{:>3}°]", temp.hotend_input),
                    input_style(TempTarget::Hotend),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Bed     ", Style::default().fg(palette::BED_ACTUAL)),
                Span::styled(
                    format!("{:>10}", temp.bed_temp_string()),
                    styles::text_primary(),
                ),
                Span::styled("  target ", styles::text_muted()),
                Span::styled(
                    format!("{:>10}", temp.bed_target_string()),
                    styles::text_secondary(),
                ),
                Span::styled("   set ", styles::text_muted()),
                Span::styled(
                    format!("[{:>3}°]", temp.bed_input),
                    input_style(TempTarget::Bed),
                ),
            ]),
        ]
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        let series = &self.state.temperature.series;

        let actual = to_points(&series.actual);
        let target = to_points(&series.target);
        let actual_bed = to_points(&series.actual_bed);
        let target_bed = to_points(&series.target_bed);

        let (x_min, x_max) = x_bounds(&series.actual, self.now_ms);
        let y_max = self.state.settings.ui.temperature_max;

        let datasets = vec![
            Dataset::default()
                .name("hotend")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette::HOTEND_ACTUAL))
                .data(&actual),
            Dataset::default()
                .name("hotend target")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette::HOTEND_TARGET))
                .data(&target),
            Dataset::default()
                .name("bed")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette::BED_ACTUAL))
                .data(&actual_bed),
            Dataset::default()
                .name("bed target")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette::BED_TARGET))
                .data(&target_bed),
        ];

        let x_labels = vec![
            axis_label(x_min as i64, self.now_ms),
            axis_label((x_min + (x_max - x_min) / 2.0) as i64, self.now_ms),
            axis_label(x_max as i64, self.now_ms),
        ];
        let y_labels = vec![
            "0".to_string(),
            format!("{:.0}", y_max / 2.0),
            format!("{y_max:.0} °C"),
        ];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .bounds([x_min, x_max])
                    .labels(x_labels)
                    .style(styles::text_muted()),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(y_labels)
                    .style(styles::text_muted()),
            )
            .render(area, buf);
    }
}

impl Widget for TemperaturePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("Temperature");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 {
            Paragraph::new(self.readout_lines()).render(inner, buf);
            return;
        }

        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(inner);

        Paragraph::new(self.readout_lines()).render(chunks[0], buf);
        self.render_chart(chunks[1], buf);
    }
}

fn to_points(points: &[TempPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|(ts, value)| (*ts as f64, *value)).collect()
}

/// Chart window: the cached series span, or the last five minutes while the
/// cache is still empty.
fn x_bounds(actual: &[TempPoint], now_ms: i64) -> (f64, f64) {
    match (actual.first(), actual.last()) {
        (Some((first, _)), Some((last, _))) if last > first => (*first as f64, *last as f64),
        (Some((first, _)), _) => (*first as f64, (*first + 1_000) as f64),
        _ => ((now_ms - EMPTY_WINDOW_MS) as f64, now_ms as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_bounds_follow_series() {
        let points = vec![(10_000_i64, 20.0), (40_000, 21.0), (70_000, 22.0)];
        assert_eq!(x_bounds(&points, 100_000), (10_000.0, 70_000.0));
    }

    #[test]
    fn test_x_bounds_single_point_widens() {
        let points = vec![(10_000_i64, 20.0)];
        assert_eq!(x_bounds(&points, 100_000), (10_000.0, 11_000.0));
    }

    #[test]
    fn test_x_bounds_empty_uses_recent_window() {
        let (min, max) = x_bounds(&[], 600_000);
        assert_eq!(max, 600_000.0);
        assert_eq!(min, 300_000.0);
    }

    #[test]
    fn test_panel_renders_readouts() {
        let mut state = AppState::new();
        state.temperature.actual_temp = 214.7;
        state.temperature.bed_temp = 60.2;

        let area = Rect::new(0, 0, 80, 16);
        let mut buf = Buffer::empty(area);
        TemperaturePanel::new(&state, 1_000_000).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..16 {
            for x in 0..80 {
                text.push_str(buf[(x, y)].symbol());
            }
        }
        assert!(text.contains("Hotend"));
        assert!(text.contains("214.7"));
        assert!(text.contains("60.2"));
    }
}
