//! Chat screen: sidebar, header, greeting, transcript, input and chips.

use crate::app::{App, ServerStatus};
use crate::screens::Screen;
use crate::ui::theme::{spinner, status_indicator, Status, Styles};
use crate::ui::widgets::{KeyHint, Sidebar, StatusBar, SuggestionChips, Transcript};
use crate::ui::{chat_layout, main_layout, sidebar_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Page title.
pub const HEADER: &str = "Data Depository Agent";

/// Greeting shown above the transcript.
pub const HERO: &str = "Hi! I\u{2019}m your company\u{2019}s knowledge companion. Ask me anything \
about projects, updates, changes, or history \u{2013} I\u{2019}ve got it all.";

/// Input placeholder.
pub const PLACEHOLDER: &str =
    "Ask a question about your team, projects, or company history\u{2026}";

/// The chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let (sidebar_area, chat_area) = sidebar_layout(main_area);

        if let Some(sidebar_area) = sidebar_area {
            Sidebar.render(sidebar_area, buf);
        }

        Block::default().style(Styles::default()).render(chat_area, buf);
        let areas = chat_layout(chat_area);

        Paragraph::new(Line::from(Span::styled(format!(" {HEADER}"), Styles::title())))
            .style(Styles::default())
            .render(areas.header, buf);

        Paragraph::new(Span::styled(HERO, Styles::dim()))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM).border_style(Styles::border()))
            .render(areas.hero, buf);

        Transcript::new(app.controller.history())
            .pending(app.controller.is_pending())
            .scroll(app.transcript_scroll)
            .render(areas.transcript, buf);

        render_input(app, areas.input, buf);

        SuggestionChips::new(&app.suggestions, app.selected_suggestion)
            .enabled(!app.controller.is_pending())
            .render(areas.suggestions, buf);

        render_status_bar(app, status_area, buf);
    }
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let pending = app.controller.is_pending();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if pending {
            Styles::dim()
        } else {
            Styles::border_active()
        })
        .title(Span::styled(" Send: Enter ", Styles::dim()))
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .enabled(!pending)
        .placeholder(PLACEHOLDER)
        .render(inner, buf);
}

fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = vec![
        KeyHint::new("Enter", "Send"),
        KeyHint::new("Tab", "Pick"),
        KeyHint::new("^S", "Ask"),
        KeyHint::new("F1", "Help"),
    ];

    let mode = if app.controller.is_pending() {
        spinner(app.tick)
    } else {
        "Chat"
    };

    let server_text;
    let mut status_bar = StatusBar::new(mode).hints(hints);
    if let Some(notification) = &app.notification {
        status_bar = status_bar.right(notification);
    } else {
        let (status, text) = match &app.server_status {
            ServerStatus::Unknown => (Status::Pending, app.server_url.clone()),
            ServerStatus::Checking => (Status::Pending, format!("{} checking", app.server_url)),
            ServerStatus::Online { latency_ms } => {
                (Status::Ready, format!("{} {latency_ms}ms", app.server_url))
            }
            ServerStatus::Unhealthy(message) => (Status::Warning, message.clone()),
            ServerStatus::Offline => (Status::Error, format!("{} offline", app.server_url)),
        };
        let (symbol, style) = status_indicator(status);
        server_text = text;
        status_bar = status_bar.indicator(symbol, style).right(&server_text);
    }
    status_bar.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_test_app, create_test_app_with, render_screen_to_string};
    use depot_engine::testing::MockAnswerService;
    use depot_engine::AnswerReply;
    use std::sync::Arc;

    #[test]
    fn test_empty_chat_screen() {
        let app = create_test_app();
        let rendered = render_screen_to_string(&ChatScreen, &app);

        assert!(rendered.contains("Upload Digital"));
        assert!(rendered.contains("+ New Chat"));
        assert!(rendered.contains("Conversation History"));
        assert!(rendered.contains(HEADER));
        assert!(rendered.contains("knowledge companion"));
        assert!(rendered.contains("No messages yet."));
        assert!(rendered.contains("Show me project updates"));
        assert!(rendered.contains("http://127.0.0.1:5000"));
    }

    #[tokio::test]
    async fn test_pending_then_answered() {
        let service = Arc::new(MockAnswerService::gated());
        service.queue_reply(AnswerReply::answer("Here are the latest updates."));
        let mut app = create_test_app_with(&service);

        app.handle_action(Action::SendSuggestion);
        let rendered = render_screen_to_string(&ChatScreen, &app);
        assert!(rendered.contains("you"));
        assert!(rendered.contains("Typing..."));

        service.release();
        app.controller.settled().await;
        app.process_conversation_events();
        let rendered = render_screen_to_string(&ChatScreen, &app);
        assert!(rendered.contains("Here are the latest updates."));
        assert!(!rendered.contains("Typing..."));
    }

    #[test]
    fn test_typed_draft_is_shown() {
        let mut app = create_test_app();
        app.input_state.insert_str("Who owns the CRM?");
        app.sync_draft();
        let rendered = render_screen_to_string(&ChatScreen, &app);
        assert!(rendered.contains("> Who owns the CRM?_"));
    }

    #[test]
    fn test_notification_replaces_server_text() {
        let mut app = create_test_app();
        app.set_notification("Only one conversation per session".to_string());
        let rendered = render_screen_to_string(&ChatScreen, &app);
        assert!(rendered.contains("Only one conversation per session"));
        assert!(!rendered.contains("http://127.0.0.1:5000"));
    }

    #[test]
    fn test_offline_server_status() {
        let mut app = create_test_app();
        app.server_status = ServerStatus::Offline;
        let rendered = render_screen_to_string(&ChatScreen, &app);
        assert!(rendered.contains("[x] http://127.0.0.1:5000 offline"));
    }

    #[test]
    fn test_narrow_terminal_hides_sidebar() {
        let app = create_test_app();
        let rendered =
            crate::test_utils::render_screen_to_string_sized(&ChatScreen, &app, 50, 20);
        assert!(!rendered.contains("Upload Digital"));
        assert!(rendered.contains(HEADER));
    }
}
