//! G-code viewer panel: loaded model info, layer position and engine
//! options.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use hostdeck_app::AppState;

use crate::theme::styles;
use crate::widgets::truncate;

pub struct GcodePanel<'a> {
    state: &'a AppState,
}

impl<'a> GcodePanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn info_lines(&self, width: usize) -> Vec<Line<'static>> {
        let gcode = &self.state.gcode;

        let mut file_spans = vec![Span::styled("File      ", styles::text_muted())];
        match &gcode.loaded_filename {
            Some(name) => {
                file_spans.push(Span::styled(
                    truncate(name, width.saturating_sub(22)),
                    styles::text_primary(),
                ));
            }
            None => file_spans.push(Span::styled("-", styles::text_muted())),
        }
        if gcode.is_loading() {
            file_spans.push(Span::styled("  (loading)", styles::status_yellow()));
        }

        let mut lines = vec![Line::from(file_spans)];

        match &gcode.model {
            Some(model) => {
                lines.push(Line::from(vec![
                    Span::styled("Model     ", styles::text_muted()),
                    Span::styled(
                        format!("{} layers, {} commands", model.layer_count, model.command_count),
                        styles::text_primary(),
                    ),
                ]));
                if let Some(filament) = model.filament_mm {
                    lines.push(Line::from(vec![
                        Span::styled("Filament  ", styles::text_muted()),
                        Span::styled(format!("{filament:.0} mm"), styles::text_primary()),
                    ]));
                }

                let mut layer_spans = vec![
                    Span::styled("Layer     ", styles::text_muted()),
                    Span::styled(
                        format!("{}/{}", gcode.layer + 1, model.layer_count),
                        styles::text_primary(),
                    ),
                ];
                if let Some(info) = &gcode.layer_info {
                    if let Some(height) = info.height_mm {
                        layer_spans.push(Span::styled(
                            format!("  Z {height:.2}"),
                            styles::text_secondary(),
                        ));
                    }
                    layer_spans.push(Span::styled(
                        format!("  commands {}..{}", gcode.cmd_first, gcode.cmd_last),
                        styles::text_muted(),
                    ));
                }
                lines.push(Line::from(layer_spans));
            }
            None => {
                lines.push(Line::from(Span::styled("no model loaded", styles::text_muted())));
            }
        }

        let sync = if gcode.sync_progress {
            Span::styled("following print progress", styles::text_primary())
        } else {
            Span::styled("manual layer selection", styles::text_secondary())
        };
        let mut sync_spans = vec![Span::styled("Sync      ", styles::text_muted()), sync];
        sync_spans.push(Span::raw("  "));
        sync_spans.extend(styles::hint("s", "toggle"));
        sync_spans.extend(styles::hint("↑/↓", "layer"));
        lines.push(Line::from(sync_spans));

        if gcode.auto_load_suspended() {
            let mut spans = vec![Span::styled(
                format!("auto-load suspended after {} failures  ", gcode.error_count),
                styles::status_red(),
            )];
            spans.extend(styles::hint("R", "retry"));
            lines.push(Line::from(spans));
        } else if gcode.error_count > 0 {
            lines.push(Line::from(Span::styled(
                format!("load failures: {}", gcode.error_count),
                styles::status_red(),
            )));
        }

        lines
    }

    fn option_lines(&self) -> Vec<Line<'static>> {
        let options = &self.state.gcode.options;

        let rows: [(&'static str, &'static str, bool); 9] = [
            ("m", "travel moves", options.show_moves),
            ("e", "retract markers", options.show_retracts),
            ("c", "centre viewport", options.center_viewport),
            ("v", "centre model on bed", options.move_model),
            ("z", "zoom to fit on load", options.zoom_on_model),
            ("n", "ghost next layer", options.show_next_layer),
            ("b", "ghost previous layer", options.show_previous_layer),
            ("o", "sort layers by Z", options.sort_layers),
            ("u", "skip empty layers", options.purge_empty_layers),
        ];

        let mut lines = vec![Line::from(Span::styled("Options", styles::accent_bold()))];
        for (key, label, enabled) in rows {
            let checkbox = if enabled {
                Span::styled("[x] ", styles::text_primary())
            } else {
                Span::styled("[ ] ", styles::text_muted())
            };
            let mut spans = vec![Span::raw("  "), checkbox];
            spans.extend(styles::hint(key, label));
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Widget for GcodePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("G-code Viewer");
        let inner = block.inner(area);
        block.render(area, buf);

        let columns =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(34)]).split(inner);

        Paragraph::new(self.info_lines(columns[0].width as usize)).render(columns[0], buf);
        Paragraph::new(self.option_lines()).render(columns[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostdeck_app::gcode_render::{LayerSummary, ModelSummary};
    use hostdeck_app::viewmodel::LoadStatus;

    fn render_to_text(state: &AppState) -> String {
        let area = Rect::new(0, 0, 90, 14);
        let mut buf = Buffer::empty(area);
        GcodePanel::new(state).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..14 {
            for x in 0..90 {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_empty_viewer_shows_placeholder_and_options() {
        let state = AppState::new();
        let text = render_to_text(&state);
        assert!(text.contains("no model loaded"));
        // Default-on options render checked.
        assert!(text.contains("[x]"));
        assert!(text.contains("travel moves"));
    }

    #[test]
    fn test_loaded_model_info() {
        let mut state = AppState::new();
        state.gcode.loaded_filename = Some("benchy.gcode".to_string());
        state.gcode.model = Some(ModelSummary {
            layer_count: 120,
            command_count: 5400,
            filament_mm: Some(912.0),
        });
        state.gcode.layer = 14;
        state.gcode.cmd_last = 36;
        state.gcode.layer_info = Some(LayerSummary {
            height_mm: Some(3.0),
            command_count: 37,
        });

        let text = render_to_text(&state);
        assert!(text.contains("benchy.gcode"));
        assert!(text.contains("120 layers, 5400 commands"));
        assert!(text.contains("912 mm"));
        assert!(text.contains("15/120"));
        assert!(text.contains("Z 3.00"));
    }

    #[test]
    fn test_loading_marker() {
        let mut state = AppState::new();
        state.gcode.status = LoadStatus::Request;

        let text = render_to_text(&state);
        assert!(text.contains("(loading)"));
    }

    #[test]
    fn test_suspension_notice() {
        let mut state = AppState::new();
        state.gcode.error_count = 3;

        let text = render_to_text(&state);
        assert!(text.contains("auto-load suspended"));
    }
}
