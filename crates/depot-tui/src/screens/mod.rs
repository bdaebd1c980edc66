//! Screen definitions for the depot TUI.

pub mod chat;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Conversation
    Enter             Send the question
    Tab / Shift+Tab   Highlight next/prev suggestion
    Ctrl+S            Ask the highlighted suggestion
    Up/Down           Recall sent lines, or scroll
    PgUp/PgDn         Scroll the transcript
    Esc               Jump to the newest message
    Ctrl+C            Quit
    F1                Toggle this help

  [Press any key to close]
";

    let width = 56.min(area.width.saturating_sub(4));
    let height = 16.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .style(Styles::default());

    paragraph.render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_help_overlay_lists_keys() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render_help_overlay(area, &mut buf);
        let rendered = buffer_to_string(&buf);
        assert!(rendered.contains("Help"));
        assert!(rendered.contains("Ctrl+S"));
        assert!(rendered.contains("Press any key to close"));
    }
}
