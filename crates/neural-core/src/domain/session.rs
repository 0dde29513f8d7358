//! WebSocket session events.
//!
//! Every WebSocket text frame carries exactly one [`SessionEvent`]. There is
//! no framing beyond that: a frame that does not decode is a protocol error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chat::Usage;

/// Discriminant of a [`SessionEvent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEventType {
    /// Server notice (connection ready, ...).
    System,
    /// Client chat turn.
    Chat,
    /// Server reply carrying the completion.
    Assistant,
    /// Server-side failure for one chat turn.
    Error,
    /// Anything else a client may send. Ignored by the server.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One complete WebSocket message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    #[serde(rename = "type", default)]
    pub kind: SessionEventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionEvent {
    fn new(kind: SessionEventType) -> Self {
        Self {
            kind,
            content: None,
            role: None,
            timestamp: Utc::now(),
            data: None,
            error: None,
        }
    }

    /// Server notice.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(SessionEventType::System)
        }
    }

    /// Client chat turn.
    pub fn chat(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(SessionEventType::Chat)
        }
    }

    /// Completion reply, with token usage attached as `data`.
    pub fn assistant(content: impl Into<String>, usage: Usage) -> Self {
        Self {
            content: Some(content.into()),
            data: serde_json::to_value(usage).ok(),
            ..Self::new(SessionEventType::Assistant)
        }
    }

    /// Per-turn failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(SessionEventType::Error)
        }
    }

    /// The prompt text if this is a chat event with non-empty content.
    pub fn chat_prompt(&self) -> Option<&str> {
        match (self.kind, self.content.as_deref()) {
            (SessionEventType::Chat, Some(content)) if !content.is_empty() => Some(content),
            _ => None,
        }
    }
}
