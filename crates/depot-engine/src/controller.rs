//! Conversation controller.
//!
//! Mediates between user input, the conversation log and the answer
//! service. Every accepted submission produces exactly one user message
//! followed, once the request settles, by exactly one agent message.
//!
//! The request itself runs on a spawned Tokio task and reports back over a
//! oneshot channel, so the owner of the controller stays responsive while a
//! request is pending. Settlement is applied either by polling
//! ([`ConversationController::poll_settled`], used from UI event loops) or
//! by awaiting ([`ConversationController::settled`]).

use crate::message::Message;
use crate::service::{AnswerReply, AnswerService, Resolution, ServiceError};
use crate::state::{ConversationState, Phase, Submission};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Reply = Result<AnswerReply, ServiceError>;

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was appended and the request dispatched.
    Dispatched,
    /// Blank text; nothing changed.
    Blank,
    /// A request is already in flight; nothing changed.
    Busy,
}

/// State change notifications for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A message was appended to the history.
    MessageAppended(Message),
    /// The pending flag changed.
    PendingChanged(bool),
    /// The draft changed.
    DraftChanged(String),
}

/// The request currently awaiting a reply.
struct InFlight {
    rx: oneshot::Receiver<Reply>,
    started: Instant,
}

/// Owns the conversation and drives the request cycle.
pub struct ConversationController {
    service: Arc<dyn AnswerService>,
    state: ConversationState,
    in_flight: Option<InFlight>,
    subscribers: Vec<mpsc::UnboundedSender<ConversationEvent>>,
}

impl ConversationController {
    /// Create a controller with an empty, idle conversation.
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        Self {
            service,
            state: ConversationState::new(),
            in_flight: None,
            subscribers: Vec::new(),
        }
    }

    /// Register an observer. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Read-only view of the history, in display order.
    pub fn history(&self) -> &[Message] {
        self.state.history()
    }

    /// Owned copy of the history.
    pub fn snapshot(&self) -> Vec<Message> {
        self.state.history().to_vec()
    }

    pub fn draft(&self) -> &str {
        self.state.draft()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Replace the draft. No other side effects.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.state.draft() {
            return;
        }
        self.state.set_draft(text.clone());
        self.emit(ConversationEvent::DraftChanged(text));
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> SubmitOutcome {
        let draft = self.state.draft().to_string();
        self.submit(&draft)
    }

    /// Submit text, typically from the draft or a suggestion.
    ///
    /// On acceptance the user message is appended before the request is
    /// dispatched. Must be called from within a Tokio runtime.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let had_draft = !self.state.draft().is_empty();

        let message = match self.state.begin(text, Utc::now()) {
            Submission::Accepted(message) => message,
            Submission::Blank => return SubmitOutcome::Blank,
            Submission::Busy => {
                debug!("Submission rejected, request already in flight");
                return SubmitOutcome::Busy;
            }
        };

        let question = message.text().to_string();
        self.emit(ConversationEvent::MessageAppended(message));
        if had_draft {
            self.emit(ConversationEvent::DraftChanged(String::new()));
        }
        self.emit(ConversationEvent::PendingChanged(true));

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        debug!(chars = question.chars().count(), "Dispatching question");
        tokio::spawn(async move {
            let result = service.ask(&question).await;
            // Receiver is gone only if the controller was dropped.
            let _ = tx.send(result);
        });

        self.in_flight = Some(InFlight {
            rx,
            started: Instant::now(),
        });
        SubmitOutcome::Dispatched
    }

    /// Apply the in-flight result if it has arrived. Never blocks.
    ///
    /// Returns the appended agent message, if any.
    pub fn poll_settled(&mut self) -> Option<Message> {
        let in_flight = self.in_flight.as_mut()?;
        let result = match in_flight.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(ServiceError::Join(
                "request task dropped its reply".to_string(),
            )),
        };
        self.finish(result)
    }

    /// Wait for the in-flight request to settle and apply it.
    ///
    /// Returns `None` immediately if nothing is in flight.
    pub async fn settled(&mut self) -> Option<Message> {
        let in_flight = self.in_flight.as_mut()?;
        let result = match (&mut in_flight.rx).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Join(
                "request task dropped its reply".to_string(),
            )),
        };
        self.finish(result)
    }

    fn finish(&mut self, result: Reply) -> Option<Message> {
        let in_flight = self.in_flight.take()?;
        let resolution = Resolution::from_result(result);

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = in_flight.started.elapsed().as_millis() as u64;
        info!(outcome = %resolution.outcome, latency_ms, "Request settled");

        let message = self.state.resolve(resolution, Utc::now())?;
        self.emit(ConversationEvent::MessageAppended(message.clone()));
        self.emit(ConversationEvent::PendingChanged(false));
        Some(message)
    }

    fn emit(&mut self, event: ConversationEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
