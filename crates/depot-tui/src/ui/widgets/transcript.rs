//! Conversation transcript widget.
//!
//! Renders the history as speaker-labelled bubbles, newest at the bottom.
//! User bubbles are right-aligned, agent bubbles left-aligned. While a
//! request is pending a "Typing..." agent bubble is appended; it is not
//! part of the history.

use crate::ui::theme::Styles;
use chrono::{DateTime, Local, TimeZone, Utc};
use depot_engine::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Text of the ephemeral bubble shown while waiting for an answer.
pub const TYPING_TEXT: &str = "Typing...";

/// Columns kept free on the far side of each bubble.
const BUBBLE_MARGIN: usize = 4;

/// Format a timestamp as `HH:MM` in the given timezone.
pub fn format_time<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

/// Scrollable transcript of the conversation.
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    messages: &'a [Message],
    pending: bool,
    scroll: usize,
    local_time: bool,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            pending: false,
            scroll: 0,
            local_time: true,
        }
    }

    /// Show the typing indicator.
    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Lines scrolled up from the bottom.
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn time(&self, timestamp: DateTime<Utc>) -> String {
        if self.local_time {
            format_time(timestamp, &Local)
        } else {
            format_time(timestamp, &Utc)
        }
    }

    /// Build the wrapped lines for a given width.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let wrap_width = usize::from(width).saturating_sub(BUBBLE_MARGIN).max(8);
        let mut lines = Vec::new();

        for message in self.messages {
            let (label_style, alignment) = match message.role() {
                Role::User => (Styles::user_label(), Alignment::Right),
                Role::Agent => (Styles::agent_label(), Alignment::Left),
            };

            lines.push(
                Line::from(vec![
                    Span::styled(message.role().to_string(), label_style),
                    Span::styled(format!(" {}", self.time(message.timestamp())), Styles::dim()),
                ])
                .alignment(alignment),
            );
            for row in textwrap::wrap(message.text(), wrap_width) {
                lines.push(Line::styled(row.into_owned(), Styles::default()).alignment(alignment));
            }

            if !message.citations().is_empty() {
                lines.push(Line::styled("Sources:", Styles::dim()).alignment(alignment));
                for citation in message.citations() {
                    let entry = if citation.title.is_empty() {
                        format!("- {}", citation.url)
                    } else {
                        format!("- {} <{}>", citation.title, citation.url)
                    };
                    for row in textwrap::wrap(&entry, wrap_width) {
                        lines.push(Line::styled(row.into_owned(), Styles::dim()).alignment(alignment));
                    }
                }
            }
            lines.push(Line::default());
        }

        if self.pending {
            lines.push(Line::styled(Role::Agent.to_string(), Styles::agent_label()));
            lines.push(Line::styled(TYPING_TEXT, Styles::dim()));
        }

        lines
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        if self.messages.is_empty() && !self.pending {
            Paragraph::new(Line::styled(
                "No messages yet. Type a question or pick a suggestion below.",
                Styles::dim(),
            ))
            .render(area, buf);
            return;
        }

        let lines = self.lines(area.width);
        let height = usize::from(area.height);
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);
        let start = lines.len().saturating_sub(height + scroll);

        let visible: Vec<Line<'_>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}
