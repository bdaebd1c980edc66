//! HTTP client for the answer service.
//!
//! Contract: `POST {base}/chat` with `{"question": "..."}` and a JSON body
//! back carrying `answer` or `error`. The backend uses 400/500 status codes
//! for its error bodies, so the body is read whatever the status.

use crate::config::Config;
use crate::service::{AnswerReply, AnswerService, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    message: String,
}

/// Result of probing the service root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Whether the service reported itself healthy.
    pub ok: bool,
    /// Message returned by the service.
    pub message: String,
    /// Round-trip time in milliseconds.
    pub latency_ms: u64,
}

/// [`AnswerService`] backed by the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    client: Client,
    chat_url: String,
    health_url: String,
    timeout: Duration,
}

impl HttpAnswerService {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Http(format!("Failed to build HTTP client: {e}")))?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            chat_url: format!("{base}/chat"),
            health_url: format!("{base}/"),
            timeout,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(&config.server_url, config.timeout())
    }

    /// Full URL questions are posted to.
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Probe the service root.
    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        let parsed: HealthBody =
            serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
                status: status.as_u16(),
                source,
            })?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(HealthStatus {
            ok: parsed.ok && status.is_success(),
            message: parsed.message,
            latency_ms,
        })
    }

    fn classify(&self, error: &reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::Timeout(self.timeout)
        } else if error.is_connect() {
            ServiceError::Connect(error.to_string())
        } else {
            ServiceError::Http(error.to_string())
        }
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, question: &str) -> Result<AnswerReply, ServiceError> {
        let response = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequest { question })
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Answer service responded");

        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}
