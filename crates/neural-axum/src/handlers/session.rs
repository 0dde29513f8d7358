//! WebSocket chat session handler.
//!
//! `GET /v1/chat/ws` upgrades to a text WebSocket carrying JSON
//! [`SessionEvent`]s.
//!
//! ## Protocol
//!
//! | Direction | `type` | Fields |
//! |---|---|---|
//! | Server → Client | `system` | `content` (welcome notice, sent once on open) |
//! | Client → Server | `chat` | `content` (prompt) |
//! | Server → Client | `assistant` | `content`, `data` (token usage) |
//! | Server → Client | `error` | `error` (generic failure notice) |
//!
//! Frames are handled strictly one at a time: a chat prompt is answered
//! before the next frame is read, so replies come back in prompt order.
//! Events of any other type are ignored. A frame that does not decode as an
//! event ends the session: the connection is dropped without a close frame.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use neural_core::config::ANY_ORIGIN;
use neural_core::{ChatCompletionRequest, GatewayConfig, SessionEvent};
use tracing::{debug, error, info, warn};

use crate::auth::AuthInfo;
use crate::error::HttpError;
use crate::state::AppState;

/// First event sent on every new session.
pub const WELCOME_MESSAGE: &str = "Neural interface connection established. Ready for input.";

/// Error text sent when a prompt could not be answered.
pub const PROCESS_FAILURE_MESSAGE: &str = "Failed to process message";

/// Whether a browser `Origin` may open a session.
///
/// Matches an allowed origin exactly, or anything when `*` is configured.
/// A request without an `Origin` header is only admitted under `*`.
pub fn origin_allowed(config: &GatewayConfig, origin: Option<&str>) -> bool {
    config
        .allowed_origins
        .iter()
        .any(|allowed| allowed == ANY_ORIGIN || origin.is_some_and(|o| o == allowed))
}

/// `GET /v1/chat/ws`.
pub async fn chat_ws(
    State(state): State<AppState>,
    auth: Option<Extension<AuthInfo>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let client_ip = auth.map_or_else(|| "unknown".to_string(), |Extension(info)| info.client_ip);
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    if !origin_allowed(&state.config, origin) {
        warn!(
            origin = origin.unwrap_or("<none>"),
            client_ip = %client_ip,
            "WebSocket origin not allowed"
        );
        return HttpError::Forbidden("Origin not allowed".to_string()).into_response();
    }

    debug!(client_ip = %client_ip, phase = SessionPhase::Connecting.as_str(), "WebSocket session state");

    ws.on_failed_upgrade(|e| error!(error = %e, "Failed to upgrade WebSocket connection"))
        .on_upgrade(move |socket| Session::new(socket, state, client_ip).run())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl SessionPhase {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// One upgraded connection.
struct Session {
    socket: WebSocket,
    state: AppState,
    client_ip: String,
    phase: SessionPhase,
}

impl Session {
    const fn new(socket: WebSocket, state: AppState, client_ip: String) -> Self {
        Self {
            socket,
            state,
            client_ip,
            phase: SessionPhase::Connecting,
        }
    }

    fn transition(&mut self, next: SessionPhase) {
        debug!(
            client_ip = %self.client_ip,
            from = self.phase.as_str(),
            to = next.as_str(),
            "WebSocket session state"
        );
        self.phase = next;
    }

    async fn run(mut self) {
        self.transition(SessionPhase::Open);
        info!(client_ip = %self.client_ip, "WebSocket connection established");

        if let Err(e) = self.send(&SessionEvent::system(WELCOME_MESSAGE)).await {
            error!(error = %e, "Failed to send welcome message");
        } else {
            self.receive_loop().await;
        }

        // No close frame: the transport closes when the socket is dropped
        // at the end of this call.
        self.transition(SessionPhase::Closing);
        self.transition(SessionPhase::Closed);
        info!(client_ip = %self.client_ip, "WebSocket connection closed");
    }

    async fn receive_loop(&mut self) {
        while let Some(frame) = self.socket.recv().await {
            let decoded = match frame {
                Ok(Message::Text(text)) => serde_json::from_str::<SessionEvent>(text.as_str()),
                Ok(Message::Binary(data)) => serde_json::from_slice::<SessionEvent>(&data),
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!(error = %e, client_ip = %self.client_ip, "WebSocket error");
                    break;
                }
            };

            let event = match decoded {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, client_ip = %self.client_ip, "Undecodable WebSocket frame");
                    break;
                }
            };

            let Some(prompt) = event.chat_prompt() else {
                debug!(kind = ?event.kind, "Ignoring WebSocket event");
                continue;
            };

            let reply = answer(&self.state, prompt).await;
            if let Err(e) = self.send(&reply).await {
                error!(error = %e, "Failed to send WebSocket response");
                break;
            }
        }
    }

    async fn send(&mut self, event: &SessionEvent) -> Result<(), axum::Error> {
        let text = serde_json::to_string(event).map_err(axum::Error::new)?;
        self.socket.send(Message::Text(text.into())).await
    }
}

/// Forward one prompt and build the reply event. Never fails: downstream
/// problems become an `error` event.
async fn answer(state: &AppState, prompt: &str) -> SessionEvent {
    let defaults = state.config.completion_defaults();
    let request = ChatCompletionRequest::single_user_message(prompt, &defaults);

    match state.completions.complete(request).await {
        Ok(response) => match response.first_content() {
            Some(content) => SessionEvent::assistant(content, response.usage),
            None => {
                error!(response_id = %response.id, "LLM response had no choices");
                SessionEvent::error(PROCESS_FAILURE_MESSAGE)
            }
        },
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Failed to get response from LLM");
            SessionEvent::error(PROCESS_FAILURE_MESSAGE)
        }
    }
}
