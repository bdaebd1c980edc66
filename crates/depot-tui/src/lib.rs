//! depot-tui: Terminal UI for the depot chat client
//!
//! This crate provides the presentation layer:
//! - The chat screen (sidebar, transcript, input bar, suggestion chips)
//! - Key handling that turns key presses into conversation intents
//! - The event loop that drives request settlement on each tick

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, ServerStatus};
pub use depot_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use depot_engine::{Config, HttpAnswerService};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application against the configured service.
///
/// Sets up the terminal, probes the service in the background, runs the
/// event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpAnswerService::from_config(config)?;
    info!(url = service.chat_url(), "Starting chat UI");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Health probe result is picked up on a later tick
    let (health_tx, health_rx) = oneshot::channel();
    let probe = service.clone();
    tokio::spawn(async move {
        let _ = health_tx.send(probe.health().await);
    });

    let mut app = App::new(Arc::new(service), config);
    app.watch_health(health_rx);

    let mut events = EventHandler::new(config.tick_rate_ms);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| draw(app, frame))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !handle_input_key(app, key) {
                        let action = event::key_to_action(key);
                        app.handle_action(action);
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                        MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        // Settle a finished request without waiting for the next tick
        app.poll_conversation();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Draw one frame: the chat screen, with the help overlay on top.
fn draw(app: &App, frame: &mut Frame<'_>) {
    let area = frame.area();
    let buf = frame.buffer_mut();

    screens::chat::ChatScreen.render(app, area, buf);

    if app.show_help {
        screens::render_help_overlay(area, buf);
    }
}

/// Handle key input for the input line.
///
/// Returns true if the key edited the input (should not be processed as an
/// action). While a request is pending the input is disabled and every key
/// falls through to the action handler.
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    if app.controller.is_pending() || app.show_help {
        return false;
    }

    // Ctrl and Alt chords are actions
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    let handled = match key.code {
        KeyCode::Char(c) => {
            app.input_state.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input_state.backspace();
            true
        }
        KeyCode::Delete => {
            app.input_state.delete();
            true
        }
        KeyCode::Left => {
            app.input_state.move_left();
            true
        }
        KeyCode::Right => {
            app.input_state.move_right();
            true
        }
        KeyCode::Home => {
            app.input_state.move_home();
            true
        }
        KeyCode::End => {
            app.input_state.move_end();
            true
        }
        // Recall only when the line is empty or already recalling; otherwise scroll
        KeyCode::Up if app.input_state.is_empty() || app.input_state.is_recalling() => {
            app.input_state.history_prev();
            true
        }
        KeyCode::Down if app.input_state.is_recalling() => {
            app.input_state.history_next();
            true
        }
        _ => false,
    };

    if handled {
        app.sync_draft();
    }
    handled
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


/// Key handling tests: key presses in, conversation state out.
#[cfg(test)]
mod key_tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_app_with};
    use depot_engine::testing::MockAnswerService;
    use depot_engine::AnswerReply;

    fn press(app: &mut App, code: KeyCode) {
        press_with(app, code, KeyModifiers::NONE);
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let key = KeyEvent::new(code, modifiers);
        if !handle_input_key(app, key) {
            app.handle_action(event::key_to_action(key));
        }
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_edits_draft() {
        let mut app = create_test_app();
        type_str(&mut app, "Helo");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.controller.draft(), "Hello");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller.draft(), "Hell");
    }

    #[test]
    fn test_letters_never_quit() {
        let mut app = create_test_app();
        type_str(&mut app, "quit?");
        assert!(!app.should_quit);
        assert_eq!(app.input_state.content(), "quit?");
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = create_test_app();
        press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_enter_on_blank_input_is_ignored() {
        let mut app = create_test_app();
        type_str(&mut app, "  ");
        press(&mut app, KeyCode::Enter);
        assert!(app.controller.history().is_empty());
        assert_eq!(app.input_state.content(), "  ");
    }

    #[tokio::test]
    async fn test_enter_round_trip() {
        let service = Arc::new(MockAnswerService::new());
        service.queue_reply(AnswerReply::answer("Ana is on project X."));
        let mut app = create_test_app_with(&service);

        type_str(&mut app, "Who's working on X?");
        press(&mut app, KeyCode::Enter);
        assert!(app.input_state.is_empty());
        assert_eq!(app.controller.draft(), "");

        app.controller.settled().await;
        app.process_conversation_events();
        let texts: Vec<&str> = app.controller.history().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["Who's working on X?", "Ana is on project X."]);
    }

    #[tokio::test]
    async fn test_input_is_disabled_while_pending() {
        let service = Arc::new(MockAnswerService::gated());
        service.queue_reply(AnswerReply::answer("done"));
        let mut app = create_test_app_with(&service);

        type_str(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        assert!(app.controller.is_pending());

        type_str(&mut app, "ignored");
        assert!(app.input_state.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.history().len(), 1);

        service.release();
        app.controller.settled().await;
        app.process_conversation_events();
        type_str(&mut app, "ok");
        assert_eq!(app.input_state.content(), "ok");
    }

    #[tokio::test]
    async fn test_up_recalls_last_sent_line() {
        let service = Arc::new(MockAnswerService::new());
        service.queue_reply(AnswerReply::answer("a"));
        let mut app = create_test_app_with(&service);

        type_str(&mut app, "Server details");
        press(&mut app, KeyCode::Enter);
        app.controller.settled().await;
        app.process_conversation_events();

        press(&mut app, KeyCode::Up);
        assert_eq!(app.input_state.content(), "Server details");
        assert_eq!(app.controller.draft(), "Server details");

        press(&mut app, KeyCode::Down);
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_up_scrolls_when_line_has_text() {
        let mut app = create_test_app();
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.transcript_scroll, 1);
        assert_eq!(app.input_state.content(), "draft");
    }

    #[test]
    fn test_help_toggle_and_close() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);

        // Any key closes help without typing into the input
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.show_help);
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_help_closes_before_quit() {
        let mut app = create_test_app();
        app.show_help = true;
        press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
