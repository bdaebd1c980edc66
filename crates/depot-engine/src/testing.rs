//! Mock answer service for tests.
//!
//! Lets controller and UI tests script replies without a server.

use crate::service::{AnswerReply, AnswerService, ServiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;

/// One scripted reaction to `ask`.
#[derive(Debug)]
pub enum MockStep {
    Reply(AnswerReply),
    Fail(ServiceError),
    Panic,
}

/// Answer service that replays queued steps in order.
///
/// With no step queued, `ask` fails with a connection error. A gated
/// service additionally waits for [`MockAnswerService::release`] before
/// answering each question.
#[derive(Debug, Default)]
pub struct MockAnswerService {
    steps: Mutex<VecDeque<MockStep>>,
    questions: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that holds every request until released.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    /// Sleep before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_reply(&self, reply: AnswerReply) {
        lock(&self.steps).push_back(MockStep::Reply(reply));
    }

    pub fn queue_error(&self, error: ServiceError) {
        lock(&self.steps).push_back(MockStep::Fail(error));
    }

    /// Make the next request task panic.
    pub fn queue_panic(&self) {
        lock(&self.steps).push_back(MockStep::Panic);
    }

    /// Let one held request proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Questions received so far, in order.
    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, question: &str) -> Result<AnswerReply, ServiceError> {
        lock(&self.questions).push(question.to_string());

        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return Err(ServiceError::Http("gate closed".into())),
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let step = lock(&self.steps).pop_front();
        match step {
            Some(MockStep::Reply(reply)) => Ok(reply),
            Some(MockStep::Fail(error)) => Err(error),
            Some(MockStep::Panic) => panic!("mock answer service panicked"),
            None => Err(ServiceError::Connect("no mock reply queued".into())),
        }
    }
}
