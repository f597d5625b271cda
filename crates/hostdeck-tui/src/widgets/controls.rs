//! Controls panel: jog pad, print speed fields and the host's custom
//! controls tree.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use hostdeck_app::AppState;
use hostdeck_client::api::SpeedStructure;
use hostdeck_core::types::ControlDefinition;

use crate::theme::styles;

pub struct ControlsPanel<'a> {
    state: &'a AppState,
}

impl<'a> ControlsPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn movement_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled("Movement", styles::accent_bold())),
            Line::from(vec![
                Span::styled("  step ", styles::text_muted()),
                Span::styled(
                    format_jog(self.state.controls.jog_distance()),
                    styles::text_primary(),
                ),
            ]),
        ];

        for (key, label) in [
            ("←→↑↓", "jog X/Y"),
            ("PgUp/PgDn", "jog Z"),
            ("x y z", "home axis"),
            ("g", "step size"),
        ] {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(styles::hint(key, label));
            lines.push(Line::from(spans));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Print speed", styles::accent_bold())));
        for structure in [
            SpeedStructure::OuterWall,
            SpeedStructure::InnerWall,
            SpeedStructure::Fill,
            SpeedStructure::Support,
        ] {
            lines.push(self.speed_row(structure));
        }

        let mut send = vec![
            Span::styled("  send ", styles::text_muted()),
            Span::styled(
                format!("[{:>5}]", self.state.speed.input),
                styles::text_primary(),
            ),
            Span::styled(" mm/min  ", styles::text_muted()),
        ];
        send.extend(styles::hint("f", "field"));
        send.extend(styles::hint("-/=", "adjust"));
        send.extend(styles::hint("F", "send"));
        lines.push(Line::from(send));

        lines
    }

    fn speed_row(&self, structure: SpeedStructure) -> Line<'static> {
        let speed = &self.state.speed;
        let selected = speed.selected == structure;
        let marker = if selected { "▸ " } else { "  " };
        let value = match speed.value_of(structure) {
            Some(v) => format!("{v:>6}"),
            None => format!("{:>6}", "-"),
        };
        Line::from(vec![
            Span::styled(format!("  {marker}"), styles::accent()),
            Span::styled(
                format!("{:<12}", speed_label(structure)),
                styles::text_secondary(),
            ),
            Span::styled(value, styles::text_primary()),
        ])
    }

    fn node_line(&self, index: usize, depth: usize, control: &ControlDefinition) -> Line<'static> {
        let indent = "  ".repeat(depth);
        match control {
            ControlDefinition::Section { name, .. } => Line::from(vec![
                Span::raw(indent),
                Span::styled(name.clone(), styles::accent_bold()),
            ]),
            ControlDefinition::Command { name, .. } => Line::from(vec![
                Span::raw(indent),
                Span::styled(name.clone(), styles::text_primary()),
            ]),
            ControlDefinition::ParametricCommand { name, input, .. } => {
                let controls = &self.state.controls;
                let editing_here = controls.editing && index == controls.cursor;

                let mut spans = vec![
                    Span::raw(indent),
                    Span::styled(name.clone(), styles::text_primary()),
                ];
                for (i, field) in input.iter().enumerate() {
                    spans.push(Span::styled(format!("  {}=", field.name), styles::text_muted()));
                    let value_style = if editing_here && i == controls.focused_input {
                        styles::selected()
                    } else {
                        styles::text_secondary()
                    };
                    spans.push(Span::styled(format!("[{}]", field.value_text()), value_style));
                }
                Line::from(spans)
            }
            ControlDefinition::Unknown => Line::from(Span::raw(indent)),
        }
    }

    fn render_tree(&self, area: Rect, buf: &mut Buffer) {
        let controls = &self.state.controls;
        if controls.controls().is_empty() {
            Paragraph::new(Span::styled("no custom controls defined", styles::text_muted()))
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = controls
            .visible_nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| ListItem::new(self.node_line(i, node.depth, node.control)))
            .collect();

        let list = List::new(items).highlight_style(styles::selected());
        let mut list_state = ListState::default().with_selected(Some(controls.cursor));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

impl Widget for ControlsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block("Controls");
        let inner = block.inner(area);
        block.render(area, buf);

        let columns =
            Layout::horizontal([Constraint::Length(36), Constraint::Min(24)]).split(inner);

        Paragraph::new(self.movement_lines()).render(columns[0], buf);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(columns[1]);
        Paragraph::new(Span::styled("Custom controls", styles::accent_bold()))
            .render(rows[0], buf);
        self.render_tree(rows[1], buf);
    }
}

fn format_jog(distance: f64) -> String {
    if distance >= 1.0 {
        format!("{distance:.0} mm")
    } else {
        format!("{distance:.1} mm")
    }
}

fn speed_label(structure: SpeedStructure) -> &'static str {
    match structure {
        SpeedStructure::OuterWall => "Outer wall",
        SpeedStructure::InnerWall => "Inner wall",
        SpeedStructure::Fill => "Fill",
        SpeedStructure::Support => "Support",
    }
}
