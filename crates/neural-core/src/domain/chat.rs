//! OpenAI-compatible chat completion types.
//!
//! These types are shared by the REST handler, the WebSocket session handler
//! and the downstream forwarder. Unknown request parameters and unknown
//! response fields are carried through in `extra` so the gateway never drops
//! data it does not understand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message.
///
/// `content` is `null` on assistant turns that only carry `tool_calls`.
/// Fields such as `reasoning_content` or `tool_calls` live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            extra: Map::new(),
        }
    }

    /// Message text, with a `null` content read as empty.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Create a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an `assistant` message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Fallback values applied to a request before it leaves the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Request body for `/v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name. Empty means "use the configured model".
    #[serde(default)]
    pub model: String,
    /// Ordered conversation. Must be non-empty before forwarding.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Any other OpenAI parameters (`top_p`, `stop`, ...), forwarded as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    /// Build a request carrying a single user turn, with every tunable
    /// taken from `defaults`.
    pub fn single_user_message(content: impl Into<String>, defaults: &CompletionDefaults) -> Self {
        Self {
            model: defaults.model.clone(),
            messages: vec![ChatMessage::user(content)],
            max_tokens: Some(defaults.max_tokens),
            temperature: Some(defaults.temperature),
            stream: false,
            user: None,
            extra: Map::new(),
        }
    }

    /// Whether the request has at least one message.
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Fill absent fields from `defaults`.
    ///
    /// Only absent values are replaced: an explicit `temperature: 0.0` is
    /// kept. `max_tokens: 0` is not a usable token budget and counts as
    /// absent, as does a blank model name. Messages and extra parameters are
    /// never touched.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &CompletionDefaults) -> Self {
        if self.model.trim().is_empty() {
            self.model.clone_from(&defaults.model);
        }
        if self.max_tokens.is_none_or(|n| n == 0) {
            self.max_tokens = Some(defaults.max_tokens);
        }
        if self.temperature.is_none() {
            self.temperature = Some(defaults.temperature);
        }
        self
    }
}

/// Token accounting reported by the downstream server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A single completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from `/v1/chat/completions` (non-streaming).
///
/// Decoded from the downstream body and re-encoded to the client unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
    /// Fields such as `system_fingerprint` or llama.cpp `timings`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if there is one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.text())
    }
}
