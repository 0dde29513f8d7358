//! Axum-specific error types and mappings.
//!
//! REST failures are rendered as the OpenAI error envelope
//! `{"error": {"message", "type", "code"}}`. Downstream detail never reaches
//! the client: it is logged by the handler and replaced by a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use neural_core::ForwardError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (malformed body or missing field).
    #[error("Bad request ({code}): {message}")]
    BadRequest { code: &'static str, message: String },

    /// WebSocket upgrade refused.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Downstream LLM unreachable or misbehaving.
    #[error("LLM service unavailable")]
    LlmUnavailable,
}

impl HttpError {
    /// Body was not a decodable chat completion request.
    pub fn invalid_json() -> Self {
        Self::BadRequest {
            code: "invalid_json",
            message: "Invalid request format".to_string(),
        }
    }

    /// Request carried no messages.
    pub fn missing_messages() -> Self {
        Self::BadRequest {
            code: "missing_messages",
            message: "At least one message is required".to_string(),
        }
    }
}

/// OpenAI-style error envelope.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: &'static str,
    code: &'static str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, error_type, code) = match self {
            Self::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                message,
                "invalid_request_error",
                code,
            ),
            Self::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                message,
                "invalid_request_error",
                "origin_not_allowed",
            ),
            Self::LlmUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM service unavailable".to_string(),
                "service_unavailable",
                "llm_error",
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                message,
                error_type,
                code,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ForwardError> for HttpError {
    fn from(_: ForwardError) -> Self {
        // Every downstream failure looks the same to clients.
        Self::LlmUnavailable
    }
}
