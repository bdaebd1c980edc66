//! Application state and update logic for the depot TUI.
//!
//! The conversation itself lives in the [`ConversationController`]; the app
//! only owns presentation state (the editing buffer, scroll position,
//! suggestion highlight, notifications).

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use depot_engine::{
    AnswerService, Config, ConversationController, ConversationEvent, HealthStatus, ServiceError,
    SubmitOutcome,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Ticks a notification stays visible (about 3 seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Lines moved by PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// Reachability of the answer service, as last probed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServerStatus {
    /// No probe was started.
    #[default]
    Unknown,
    Checking,
    Online { latency_ms: u64 },
    /// Reachable, but reported itself unhealthy.
    Unhealthy(String),
    Offline,
}

impl From<Result<HealthStatus, ServiceError>> for ServerStatus {
    fn from(result: Result<HealthStatus, ServiceError>) -> Self {
        match result {
            Ok(health) if health.ok => Self::Online {
                latency_ms: health.latency_ms,
            },
            Ok(health) => Self::Unhealthy(health.message),
            Err(_) => Self::Offline,
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// The conversation.
    pub controller: ConversationController,

    /// Editing buffer for the draft. Mirrors the controller's draft.
    pub input_state: TextInputState,

    /// Suggested prompts.
    pub suggestions: Vec<String>,

    /// Index of the highlighted suggestion.
    pub selected_suggestion: usize,

    /// Lines scrolled up from the bottom of the transcript (0 = follow).
    pub transcript_scroll: usize,

    /// Base URL of the answer service, for display.
    pub server_url: String,

    /// Result of the startup health probe.
    pub server_status: ServerStatus,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Conversation change notifications.
    events: mpsc::UnboundedReceiver<ConversationEvent>,

    /// Pending health probe result.
    health_rx: Option<oneshot::Receiver<Result<HealthStatus, ServiceError>>>,
}

impl App {
    /// Create a new app talking to `service`.
    pub fn new(service: Arc<dyn AnswerService>, config: &Config) -> Self {
        let mut controller = ConversationController::new(service);
        let events = controller.subscribe();

        Self {
            should_quit: false,
            show_help: false,
            controller,
            input_state: TextInputState::new(),
            suggestions: config.suggestions.clone(),
            selected_suggestion: 0,
            transcript_scroll: 0,
            server_url: config.server_url.clone(),
            server_status: ServerStatus::Unknown,
            tick: 0,
            notification: None,
            notification_ttl: 0,
            events,
            health_rx: None,
        }
    }

    /// Pick up a health probe result on a later tick.
    pub fn watch_health(&mut self, rx: oneshot::Receiver<Result<HealthStatus, ServiceError>>) {
        self.server_status = ServerStatus::Checking;
        self.health_rx = Some(rx);
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::Send => self.submit_draft(),
            Action::SendSuggestion => self.submit_suggestion(),
            Action::NextSuggestion => self.select_suggestion(1),
            Action::PrevSuggestion => self.select_suggestion(-1),
            Action::NewChat => {
                self.set_notification("Only one conversation per session".to_string());
            }
            Action::Back => self.transcript_scroll = 0,
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.scroll_down(PAGE_SCROLL),
            Action::Quit | Action::Help | Action::None => {}
        }
        self.process_conversation_events();
    }

    /// Push the editing buffer into the controller's draft.
    pub fn sync_draft(&mut self) {
        self.controller
            .update_draft(self.input_state.content().to_string());
        self.process_conversation_events();
    }

    /// Submit the current draft (Enter).
    pub fn submit_draft(&mut self) {
        self.sync_draft();
        match self.controller.submit_draft() {
            SubmitOutcome::Dispatched => {
                // Records the line for Up/Down recall
                self.input_state.submit();
            }
            SubmitOutcome::Blank => {}
            SubmitOutcome::Busy => self.notify_busy(),
        }
    }

    /// Submit the highlighted suggestion.
    pub fn submit_suggestion(&mut self) {
        let Some(text) = self.suggestions.get(self.selected_suggestion).cloned() else {
            return;
        };
        if self.controller.submit(&text) == SubmitOutcome::Busy {
            self.notify_busy();
        }
    }

    fn notify_busy(&mut self) {
        self.set_notification("Still waiting for the previous answer".to_string());
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn select_suggestion(&mut self, delta: isize) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        let next = (self.selected_suggestion as isize + delta).rem_euclid(len as isize);
        self.selected_suggestion = next as usize;
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Apply a settled request, if any, and drain conversation events.
    pub fn poll_conversation(&mut self) {
        self.controller.poll_settled();
        self.process_conversation_events();
    }

    /// React to controller notifications.
    pub fn process_conversation_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ConversationEvent::MessageAppended(message) => {
                    debug!(role = %message.role(), "Message appended");
                    // Jump back to the newest message
                    self.transcript_scroll = 0;
                }
                ConversationEvent::DraftChanged(draft) => {
                    if draft != self.input_state.content() {
                        self.input_state.set_content(draft);
                    }
                }
                ConversationEvent::PendingChanged(_) => {}
            }
        }
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        if let Some(rx) = &mut self.health_rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.server_status = ServerStatus::from(result);
                    self.health_rx = None;
                }
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.server_status = ServerStatus::Offline;
                    self.health_rx = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
            }
        }

        self.poll_conversation();
    }
}
