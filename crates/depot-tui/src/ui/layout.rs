//! Layout helpers for the depot TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width in columns.
pub const SIDEBAR_WIDTH: u16 = 22;

/// Below this width the sidebar is hidden.
const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 60;

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split off the sidebar. Returns `None` for the sidebar on narrow terminals.
pub fn sidebar_layout(area: Rect) -> (Option<Rect>, Rect) {
    if area.width < SIDEBAR_MIN_TERMINAL_WIDTH {
        return (None, area);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);
    (Some(chunks[0]), chunks[1])
}

/// Regions of the chat pane, top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct ChatAreas {
    pub header: Rect,
    pub hero: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub suggestions: Rect,
}

/// Split the chat pane into header, hero, transcript, input and chips.
pub fn chat_layout(area: Rect) -> ChatAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(4), // Hero greeting
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input bar
            Constraint::Length(1), // Suggestion chips
        ])
        .split(area);
    ChatAreas {
        header: chunks[0],
        hero: chunks[1],
        transcript: chunks[2],
        input: chunks[3],
        suggestions: chunks[4],
    }
}
