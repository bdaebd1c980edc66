//! The answer service seam.
//!
//! [`AnswerService`] is the only collaborator the controller talks to.
//! The HTTP implementation lives in [`crate::http`]; tests use
//! [`crate::testing::MockAnswerService`].

use crate::message::Citation;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Text shown in place of an answer when the request could not complete.
pub const FALLBACK_TEXT: &str = "Error connecting to server.";

/// Remote endpoint that answers questions.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask a question. Must resolve or fail; never hang without bound.
    async fn ask(&self, question: &str) -> Result<AnswerReply, ServiceError>;
}

/// Body returned by the service.
///
/// The service sends exactly one of `answer` or `error`. Unknown fields are
/// ignored and citations that fail to parse are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_citations",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub citations: Vec<Citation>,
}

fn lenient_citations<'de, D>(deserializer: D) -> Result<Vec<Citation>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl AnswerReply {
    /// Reply carrying an answer.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: Some(text.into()),
            ..Self::default()
        }
    }

    /// Reply carrying a service-reported error.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            error: Some(text.into()),
            ..Self::default()
        }
    }

    /// Attach citations.
    #[must_use]
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    /// Pick the text to show for this reply.
    ///
    /// A non-empty answer wins, then the error field, then an empty answer.
    /// A reply with neither field is treated as a transport failure.
    pub fn into_resolution(self) -> Result<Resolution, ServiceError> {
        match (self.answer, self.error) {
            (Some(answer), _) if !answer.is_empty() => Ok(Resolution {
                outcome: Outcome::Answered,
                text: answer,
                citations: self.citations,
            }),
            (_, Some(error)) => Ok(Resolution {
                outcome: Outcome::ServiceReported,
                text: error,
                citations: Vec::new(),
            }),
            (Some(answer), None) => Ok(Resolution {
                outcome: Outcome::Answered,
                text: answer,
                citations: self.citations,
            }),
            (None, None) => Err(ServiceError::MissingFields),
        }
    }
}

/// How a settled request was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The service answered.
    Answered,
    /// The service responded with an error field.
    ServiceReported,
    /// The request could not complete or the body was unusable.
    TransportFailure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Answered => write!(f, "answered"),
            Self::ServiceReported => write!(f, "service_error"),
            Self::TransportFailure => write!(f, "transport_failure"),
        }
    }
}

/// The agent message a settled request turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub text: String,
    pub citations: Vec<Citation>,
}

impl Resolution {
    /// Map any settled call to exactly one agent message body.
    pub fn from_result(result: Result<AnswerReply, ServiceError>) -> Self {
        match result.and_then(AnswerReply::into_resolution) {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "Answer request failed");
                Self::transport_failure()
            }
        }
    }

    /// The fixed fallback message.
    pub fn transport_failure() -> Self {
        Self {
            outcome: Outcome::TransportFailure,
            text: FALLBACK_TEXT.to_string(),
            citations: Vec::new(),
        }
    }
}

/// Errors that can occur talking to the answer service.
///
/// None of these reach the user verbatim; they all become [`FALLBACK_TEXT`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// No response within the caller's timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other transport-level failure.
    #[error("Request failed: {0}")]
    Http(String),

    /// The body was not a JSON reply.
    #[error("Invalid response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but carried neither `answer` nor `error`.
    #[error("Response carried neither an answer nor an error")]
    MissingFields,

    /// The request task died before settling.
    #[error("Request task ended abnormally: {0}")]
    Join(String),
}

impl ServiceError {
    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::Http(_) => "http",
            Self::Decode { .. } => "decode",
            Self::MissingFields => "missing_fields",
            Self::Join(_) => "join",
        }
    }
}
