//! Suggested prompt chips.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// A row of suggestion chips with one highlighted.
#[derive(Debug, Clone)]
pub struct SuggestionChips<'a> {
    items: &'a [String],
    selected: usize,
    enabled: bool,
}

impl<'a> SuggestionChips<'a> {
    pub fn new(items: &'a [String], selected: usize) -> Self {
        Self {
            items,
            selected,
            enabled: true,
        }
    }

    /// A disabled row is drawn dimmed, without a highlight.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Widget for SuggestionChips<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || self.items.is_empty() {
            return;
        }

        let mut spans = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if !self.enabled {
                Styles::dim()
            } else if i == self.selected {
                Styles::chip_selected()
            } else {
                Styles::chip()
            };
            spans.push(Span::styled(format!(" {item} "), style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
