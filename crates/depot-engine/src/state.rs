//! Conversation state.
//!
//! [`ConversationState`] is the synchronous half of the controller: it owns
//! the ordered message log, the unsent draft and the pending flag, and it
//! decides whether a submission is accepted. It never performs I/O.

use crate::message::Message;
use crate::service::Resolution;
use chrono::{DateTime, Utc};

/// Where the conversation is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request in flight.
    #[default]
    Idle,
    /// Exactly one request in flight.
    AwaitingResponse,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResponse => write!(f, "awaiting_response"),
        }
    }
}

/// Result of offering text to [`ConversationState::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The user message was appended; the question must now be dispatched.
    Accepted(Message),
    /// The text was blank. Nothing changed.
    Blank,
    /// A request is already in flight. Nothing changed.
    Busy,
}

/// Session-scoped conversation state.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    history: Vec<Message>,
    draft: String,
    pending: bool,
}

impl ConversationState {
    /// Create an empty, idle conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in display order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Current unsent input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn phase(&self) -> Phase {
        if self.pending {
            Phase::AwaitingResponse
        } else {
            Phase::Idle
        }
    }

    /// Replace the draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Offer text for submission.
    ///
    /// Blank text and submissions while pending leave the state untouched.
    /// Otherwise the trimmed text is appended as a user message, the draft
    /// is cleared and the state becomes pending.
    pub fn begin(&mut self, text: &str, now: DateTime<Utc>) -> Submission {
        let question = text.trim();
        if question.is_empty() {
            return Submission::Blank;
        }
        if self.pending {
            return Submission::Busy;
        }

        let message = Message::user(question, self.stamp(now));
        self.history.push(message.clone());
        self.draft.clear();
        self.pending = true;
        Submission::Accepted(message)
    }

    /// Append the agent message for the in-flight request and go idle.
    ///
    /// Returns `None` (and changes nothing) if no request is pending.
    pub fn resolve(&mut self, resolution: Resolution, now: DateTime<Utc>) -> Option<Message> {
        if !self.pending {
            return None;
        }

        let message = Message::agent(resolution.text, resolution.citations, self.stamp(now));
        self.history.push(message.clone());
        self.pending = false;
        Some(message)
    }

    /// Never earlier than the last message, even if the clock steps back.
    fn stamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.history
            .last()
            .map_or(now, |last| now.max(last.timestamp()))
    }
}
