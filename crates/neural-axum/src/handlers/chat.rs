//! OpenAI-compatible chat completion handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use neural_core::{ChatCompletionRequest, ChatCompletionResponse};
use tracing::{error, info, warn};

use crate::auth::AuthInfo;
use crate::error::HttpError;
use crate::state::AppState;

/// `POST /v1/chat/completions`.
///
/// The body is decoded by hand so a malformed body maps to `invalid_json`
/// instead of axum's default rejection.
pub async fn completions(
    State(state): State<AppState>,
    auth: Option<Extension<AuthInfo>>,
    body: Bytes,
) -> Result<Json<ChatCompletionResponse>, HttpError> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Invalid chat completion request");
        HttpError::invalid_json()
    })?;

    if !request.has_messages() {
        return Err(HttpError::missing_messages());
    }
    let request = request.with_defaults(&state.config.completion_defaults());

    let (authenticated, client_ip) = auth
        .as_ref()
        .map_or((false, "unknown"), |Extension(info)| {
            (info.authenticated, info.client_ip.as_str())
        });
    info!(
        model = %request.model,
        messages = request.messages.len(),
        authenticated,
        client_ip,
        "Processing chat completion request"
    );

    let response = state.completions.complete(request).await.map_err(|e| {
        error!(error = %e, kind = e.kind(), "Failed to get response from LLM");
        HttpError::from(e)
    })?;

    Ok(Json(response))
}
