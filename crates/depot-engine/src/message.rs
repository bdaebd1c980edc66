//! Chat message types.
//!
//! Messages are immutable once created. The conversation log only ever
//! appends them, so every field is set at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the client.
    User,
    /// The answer service.
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "you"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

/// A source the service cited for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Page or document title (may be empty).
    #[serde(default)]
    pub title: String,
    /// Link to the source.
    pub url: String,
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    citations: Vec<Citation>,
}

impl Message {
    /// Create a user message. The caller is responsible for trimming.
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp,
            citations: Vec::new(),
        }
    }

    /// Create an agent message.
    pub fn agent(
        text: impl Into<String>,
        citations: Vec<Citation>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            timestamp,
            citations,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Sources attached by the service. Always empty for user messages.
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
