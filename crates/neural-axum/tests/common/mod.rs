//! Shared fixtures for neural-axum integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use mockall::mock;
use neural_axum::{GatewayContext, create_router, serve};
use neural_core::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, CompletionPort,
    ForwardError, GatewayConfig, Usage,
};
use serde_json::Map;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};
use tokio_util::sync::CancellationToken;

pub const TEST_ORIGIN: &str = "http://localhost:3000";
pub const TEST_MODEL: &str = "test-model.gguf";

mock! {
    pub Completions {}

    #[async_trait]
    impl CompletionPort for Completions {
        async fn complete(
            &self,
            request: ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, ForwardError>;

        async fn is_reachable(&self) -> bool;
    }
}

/// Configuration with auth off and a single allowed origin.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        port: 0,
        model_name: TEST_MODEL.into(),
        allowed_origins: vec![TEST_ORIGIN.into()],
        ..GatewayConfig::default()
    }
}

/// A one-choice completion with fixed usage.
pub fn completion(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "chatcmpl-1".into(),
        object: "chat.completion".into(),
        created: 1_700_000_000,
        model: TEST_MODEL.into(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage::assistant(content),
            finish_reason: Some("stop".into()),
            extra: Map::new(),
        }],
        usage: Usage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
        },
        extra: Map::new(),
    }
}

pub fn context(config: GatewayConfig, completions: MockCompletions) -> GatewayContext {
    GatewayContext::new(config, Arc::new(completions))
}

pub fn app(config: GatewayConfig, completions: MockCompletions) -> Router {
    create_router(context(config, completions))
}

/// Run the gateway on an ephemeral port. Dropping the token's last clone
/// does not stop the server; call `cancel()`.
pub async fn spawn_gateway(
    config: GatewayConfig,
    completions: MockCompletions,
) -> (SocketAddr, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();

    tokio::spawn(serve(listener, context(config, completions), cancel.clone()));

    (addr, cancel)
}

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open `/v1/chat/ws`, optionally sending `Origin` and `Authorization`.
pub async fn connect_ws(
    addr: SocketAddr,
    origin: Option<&str>,
    bearer: Option<&str>,
) -> Result<WsClient, tungstenite::Error> {
    let mut request = format!("ws://{addr}/v1/chat/ws")
        .into_client_request()
        .unwrap();
    if let Some(origin) = origin {
        request
            .headers_mut()
            .insert("Origin", origin.parse().unwrap());
    }
    if let Some(token) = bearer {
        request
            .headers_mut()
            .insert("Authorization", format!("Bearer {token}").parse().unwrap());
    }
    let (stream, _) = tokio_tungstenite::connect_async(request).await?;
    Ok(stream)
}
