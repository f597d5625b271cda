//! Panel tab bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Tabs, Widget},
};

use hostdeck_app::UiTab;

use crate::theme::styles;

/// Tab strip over every panel, highlighting the active one.
pub struct TabBar {
    active: UiTab,
}

impl TabBar {
    pub fn new(active: UiTab) -> Self {
        Self { active }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let titles: Vec<Line<'static>> = UiTab::all()
            .iter()
            .map(|tab| Line::from(format!(" {} ", tab.title())))
            .collect();
        let selected = UiTab::all().iter().position(|tab| *tab == self.active).unwrap_or(0);

        let padded = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };
        Tabs::new(titles)
            .select(selected)
            .style(styles::text_secondary())
            .highlight_style(styles::selected())
            .divider("│")
            .render(padded, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_bar_lists_every_panel() {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);

        TabBar::new(UiTab::Files).render(area, &mut buf);

        let row: String = (0..100).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        for tab in UiTab::all() {
            assert!(row.contains(tab.title()), "missing tab {}", tab.title());
        }
    }
}
