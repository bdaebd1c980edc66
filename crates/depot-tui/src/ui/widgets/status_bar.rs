//! Status bar widget.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
    indicator: Option<(&'a str, Style)>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
            indicator: None,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }

    /// Status symbol drawn before the right-aligned text.
    #[must_use]
    pub fn indicator(mut self, symbol: &'a str, style: Style) -> Self {
        self.indicator = Some((symbol, style));
        self
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = Vec::new();

        // Mode indicator (bright accent background)
        spans.push(Span::styled(
            format!(" {} ", self.mode),
            Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
        ));
        spans.push(Span::styled(" ", Styles::status_bar()));

        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(
                format!(" {} ", hint.label),
                Styles::key_label(),
            ));
        }

        let left_line = Line::from(spans);
        buf.set_line(area.x, area.y, &left_line, area.width);

        // Right side: optional indicator, then text
        let mut right = Vec::new();
        if let Some((symbol, style)) = self.indicator {
            right.push(Span::styled(symbol, style.bg(Palette::STATUS_BG)));
            right.push(Span::styled(" ", Styles::status_bar()));
        }
        if let Some(text) = self.right_text {
            right.push(Span::styled(text, Styles::status_bar()));
        }
        let right_line = Line::from(right);
        let right_len = right_line.width() as u16;
        if right_len > 0 && right_len < area.width {
            let x = area.x + area.width - right_len - 1;
            buf.set_line(x, area.y, &right_line, right_len);
        }
    }
}
