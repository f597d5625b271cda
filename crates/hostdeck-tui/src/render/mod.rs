//! Main render function (View in TEA pattern).

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use hostdeck_app::{AppState, UiTab};

use crate::layout;
use crate::theme::{palette, styles};
use crate::widgets;

/// Render the complete UI. Pure: reads state, never mutates it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg = Block::default().style(Style::default().bg(palette::PANEL_BG));
    frame.render_widget(bg, area);

    let areas = layout::create(area);
    let now_ms = chrono::Utc::now().timestamp_millis();

    frame.render_widget(widgets::MainHeader::new(state), areas.header);
    frame.render_widget(widgets::TabBar::new(state.active_tab), areas.tabs);

    match state.active_tab {
        UiTab::Connection => frame.render_widget(widgets::ConnectionPanel::new(state), areas.body),
        UiTab::Temperature => {
            frame.render_widget(widgets::TemperaturePanel::new(state, now_ms), areas.body);
        }
        UiTab::Controls => frame.render_widget(widgets::ControlsPanel::new(state), areas.body),
        UiTab::Terminal => frame.render_widget(widgets::TerminalPanel::new(state), areas.body),
        UiTab::Files => frame.render_widget(widgets::FilesPanel::new(state), areas.body),
        UiTab::Webcam => {
            frame.render_widget(widgets::WebcamPanel::new(state, now_ms), areas.body);
        }
        UiTab::Gcode => frame.render_widget(widgets::GcodePanel::new(state), areas.body),
    }

    frame.render_widget(Paragraph::new(help_line(state)), areas.footer);

    // Overlays draw last so they sit on top of whatever panel is active.
    if let Some(notice) = state.offline {
        frame.render_widget(widgets::OfflineOverlay::new(notice), area);
    }
}

/// Footer key hints for the active panel.
fn help_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(styles::hint("Tab", "panel"));

    let pairs: &[(&'static str, &'static str)] = match state.active_tab {
        UiTab::Connection => &[
            ("Enter", "connect"),
            ("p", "port"),
            ("b", "baud"),
            ("P", "print"),
            ("Space", "pause"),
            ("X", "cancel"),
        ],
        UiTab::Temperature => &[("←/→", "focus"), ("↑/↓", "adjust"), ("Enter", "send")],
        UiTab::Controls => {
            if state.controls.editing {
                &[("[/]", "input"), ("Backspace", "erase"), ("Enter", "done")]
            } else {
                &[("k/j", "select"), ("Enter", "run"), ("i", "edit"), ("arrows", "jog")]
            }
        }
        UiTab::Terminal => {
            &[("Enter", "send"), ("Ctrl+S", "follow"), ("Ctrl+U", "clear"), ("PgUp/PgDn", "scroll")]
        }
        UiTab::Files => &[
            ("↑/↓", "select"),
            ("←/→", "page"),
            ("Enter", "load"),
            ("d", "delete"),
            ("r", "refresh"),
        ],
        UiTab::Webcam => &[("↑/↓", "select"), ("m", "mode"), ("Enter", "save"), ("d", "delete")],
        UiTab::Gcode => &[("↑/↓", "layer"), ("s", "sync"), ("R", "refresh")],
    };
    for &(key, label) in pairs {
        spans.extend(styles::hint(key, label));
    }

    // The terminal panel types into its input field, so plain q stays a
    // character there.
    if state.active_tab == UiTab::Terminal || state.controls.editing {
        spans.extend(styles::hint("Ctrl+C", "quit"));
    } else {
        spans.extend(styles::hint("q", "quit"));
    }

    Line::from(spans)
}
