//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// A single-line text input widget.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    /// The text content.
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    /// Whether the input accepts keystrokes.
    enabled: bool,
    /// Placeholder text.
    placeholder: Option<&'a str>,
    /// Prompt prefix.
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Create a new text input.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            cursor: content.chars().count(),
            enabled: true,
            placeholder: None,
            prompt: "> ",
        }
    }

    /// Set enabled state. A disabled input shows no cursor and is dimmed.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let text_style = if self.enabled {
            Styles::default()
        } else {
            Styles::dim()
        };
        let mut spans = vec![Span::styled(self.prompt, Styles::active())];

        if self.content.is_empty() {
            if self.enabled {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let (before, after) = split_at_char(self.content, self.cursor);

        // Keep the cursor in view: drop leading characters that overflow
        let available = usize::from(area.width)
            .saturating_sub(self.prompt.width())
            .saturating_sub(1);
        let visible_before = tail_fitting(before, available);

        spans.push(Span::styled(visible_before.to_string(), text_style));
        if self.enabled {
            let marker = if after.is_empty() { "_" } else { "|" };
            spans.push(Span::styled(marker, Styles::active()));
        }
        spans.push(Span::styled(after.to_string(), text_style));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

fn split_at_char(s: &str, char_index: usize) -> (&str, &str) {
    let byte = s
        .char_indices()
        .nth(char_index)
        .map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}

/// Longest suffix of `s` that fits in `width` columns.
fn tail_fitting(s: &str, width: usize) -> &str {
    let mut start = s.len();
    let mut used = 0;
    for (i, ch) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &s[start..]
}

/// State for a text input, managing content and cursor position.
#[derive(Debug, Clone)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Submitted lines for Up/Down recall.
    history: Vec<String>,
    /// Current history index (-1 = current input).
    history_index: isize,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl Default for TextInputState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: -1,
            saved_input: String::new(),
        }
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether Up/Down is currently walking the history.
    pub fn is_recalling(&self) -> bool {
        self.history_index >= 0
    }

    /// Replace the content, placing the cursor at the end.
    pub fn set_content(&mut self, content: String) {
        self.cursor = content.chars().count();
        self.content = content;
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Add current content to history and clear.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = -1;
        self.saved_input.clear();
        content
    }

    /// Navigate to previous history entry.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        if self.history_index == -1 {
            self.saved_input = self.content.clone();
        }

        let new_index = self.history_index + 1;
        if (new_index as usize) < self.history.len() {
            self.history_index = new_index;
            let entry = self.history[self.history.len() - 1 - new_index as usize].clone();
            self.set_content(entry);
        }
    }

    /// Navigate to next history entry.
    #[allow(clippy::cast_sign_loss)]
    pub fn history_next(&mut self) {
        if self.history_index <= 0 {
            if self.history_index == 0 {
                let saved = std::mem::take(&mut self.saved_input);
                self.set_content(saved);
            }
            self.history_index = -1;
            return;
        }

        self.history_index -= 1;
        let entry = self.history[self.history.len() - 1 - self.history_index as usize].clone();
        self.set_content(entry);
    }

    /// Create a widget from this state.
    pub fn widget(&self) -> TextInput<'_> {
        let mut input = TextInput::new(&self.content);
        input.cursor = self.cursor;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor(), 2);

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor(), 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        assert_eq!(state.cursor(), 0);
        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("Who\u{2019}s");
        assert_eq!(state.cursor(), 5);

        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "Whos");

        state.insert('\'');
        assert_eq!(state.content(), "Who's");
    }

    #[test]
    fn test_text_input_state_history() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.insert_str("unsent");
        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");

        state.history_next();
        assert_eq!(state.content(), "unsent");
    }

    #[test]
    fn test_blank_lines_are_not_recorded() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        state.submit();
        state.history_prev();
        assert!(state.is_empty());
    }

    #[test]
    fn test_render_placeholder() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let state = TextInputState::new();
        state.widget().placeholder("Ask...").render(area, &mut buf);
        insta::assert_snapshot!(buffer_to_string(&buf), @"> _Ask...");
    }

    #[test]
    fn test_render_disabled_hides_cursor() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut state = TextInputState::new();
        state.insert_str("hello");
        state.widget().enabled(false).render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> hello");
    }

    #[test]
    fn test_render_keeps_cursor_visible() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        let mut state = TextInputState::new();
        state.insert_str("abcdefghijkl");
        state.widget().render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> fghijkl_");
    }
}
