//! Connection panel: serial link controls and job summary.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use hostdeck_app::AppState;

use crate::theme::styles;

pub struct ConnectionPanel<'a> {
    state: &'a AppState,
}

impl<'a> ConnectionPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn entry(label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {label:<18}"), styles::text_muted()),
            Span::styled(value, styles::text_primary()),
        ])
    }

    fn link_lines(&self) -> Vec<Line<'static>> {
        let conn = &self.state.connection;
        let mut lines = Vec::new();

        if !conn.panel_open {
            lines.push(Line::from(Span::styled(
                "  Connection settings hidden",
                styles::text_muted(),
            )));
            return lines;
        }

        let port = conn.selected_port.as_deref().unwrap_or("AUTO").to_string();
        let baudrate = conn
            .selected_baudrate
            .map(|b| b.to_string())
            .unwrap_or_else(|| "AUTO".to_string());

        lines.push(Self::entry("Port", port));
        if !conn.ports.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    available: {}", conn.ports.join(", ")),
                styles::text_muted(),
            )));
        }
        lines.push(Self::entry("Baudrate", baudrate));
        if !conn.baudrates.is_empty() {
            let rates: Vec<String> = conn.baudrates.iter().map(|b| b.to_string()).collect();
            lines.push(Line::from(Span::styled(
                format!("    available: {}", rates.join(", ")),
                styles::text_muted(),
            )));
        }

        let checkbox = if conn.save_settings { "[x]" } else { "[ ]" };
        lines.push(Self::entry("Save as default", checkbox.to_string()));

        let label = conn.connect_label(self.state.flags.is_closed_or_error());
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("[ {label} ]"), styles::accent_bold()),
        ]));

        lines
    }

    fn job_lines(&self) -> Vec<Line<'static>> {
        let printer = &self.state.printer;
        let mut lines = vec![Line::from(Span::styled("  Job", styles::accent()))];

        match &printer.filename {
            None => lines.push(Line::from(Span::styled(
                "    no job loaded",
                styles::text_muted(),
            ))),
            Some(_) => {
                let dash = || "-".to_string();
                lines.push(Self::entry(
                    "  File",
                    printer.display_filename(self.state.flags.is_loading()),
                ));
                lines.push(Self::entry(
                    "  Estimated time",
                    printer.estimated_print_time.clone().unwrap_or_else(dash),
                ));
                lines.push(Self::entry(
                    "  Filament",
                    printer.filament.clone().unwrap_or_else(dash),
                ));
                lines.push(Self::entry(
                    "  Time printed",
                    printer.print_time.clone().unwrap_or_else(dash),
                ));
                lines.push(Self::entry(
                    "  Time left",
                    printer.print_time_left.clone().unwrap_or_else(dash),
                ));
                lines.push(Self::entry("  Line", printer.line_string()));
                let height = printer.current_z.map(|z| format!("Z {z:.2}"));
                lines.push(Self::entry("  Height", height.unwrap_or_else(dash)));
            }
        }

        let pause = printer.pause_label(self.state.flags.is_paused());
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("[P]", styles::status_yellow()),
            Span::styled(" Print  ", styles::text_muted()),
            Span::styled("[Space]", styles::status_yellow()),
            Span::styled(format!(" {pause}  "), styles::text_muted()),
            Span::styled("[X]", styles::status_yellow()),
            Span::styled(" Cancel", styles::text_muted()),
        ]));

        lines
    }
}

impl Widget for ConnectionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::default()];
        lines.extend(self.link_lines());
        lines.push(Line::default());
        lines.extend(self.job_lines());

        Paragraph::new(lines)
            .block(styles::panel_block("Connection"))
            .render(area, buf);
    }
}
