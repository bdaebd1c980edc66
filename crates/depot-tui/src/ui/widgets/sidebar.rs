//! Sidebar with branding and the (single) conversation list.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Brand shown at the top of the sidebar.
pub const BRAND: &str = "Upload Digital";

/// Left-hand sidebar. Conversation history is a placeholder: a session
/// holds exactly one conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sidebar;

impl Widget for Sidebar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Styles::border())
            .style(Styles::sidebar());
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(Span::styled(format!(" {BRAND}"), Styles::title())),
            Line::from(""),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(" + New Chat ", Styles::chip()),
            ]),
            Line::from(""),
            Line::from(Span::styled(" Conversation History", Styles::dim())),
        ];
        Paragraph::new(lines).style(Styles::sidebar()).render(inner, buf);
    }
}
