//! Completion port for forwarding chat requests downstream.
//!
//! The REST handler and the WebSocket session handler both talk to the
//! downstream LLM through this trait, so the forwarding logic exists once.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChatCompletionRequest, ChatCompletionResponse};

/// Classified downstream failure.
///
/// Callers must never echo the inner detail to clients; it is for logs.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Connection refused, DNS failure, timeout, or a body that could not
    /// be read.
    #[error("LLM unreachable: {0}")]
    Unreachable(String),

    /// The downstream answered with a non-200 status.
    #[error("LLM returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The downstream answered 200 but the body is not a completion.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),
}

impl ForwardError {
    /// Stable short name for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Port for issuing chat completions against the downstream LLM.
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// Fill defaults, send one request, and decode the reply.
    ///
    /// Callers must reject requests with no messages before calling this.
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ForwardError>;

    /// Whether the downstream answers HTTP at all.
    ///
    /// Any response, including 404, counts as reachable: the downstream has
    /// no dedicated health endpoint.
    async fn is_reachable(&self) -> bool;
}
