//! Route definitions and router construction.
//!
//! `/health`, `/status` and `/mcp/capabilities` are public. The chat routes
//! sit behind the optional auth gate.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::optional_auth;
use crate::bootstrap::{CorsConfig, GatewayContext};
use crate::handlers;
use crate::state::AppState;

/// Preflight cache lifetime for production CORS.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

const CORS_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

const CORS_HEADERS: [HeaderName; 4] = [
    header::ORIGIN,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    header::AUTHORIZATION,
];

/// Build CORS layer from configuration.
pub(crate) fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(CORS_METHODS)
                .allow_headers(CORS_HEADERS)
                .allow_credentials(true)
                .max_age(CORS_MAX_AGE)
        }
    }
}

/// Chat routes behind the auth gate.
fn chat_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/chat/completions", post(handlers::chat::completions))
        .route("/v1/chat/ws", get(handlers::session::chat_ws))
        .route_layer(from_fn_with_state(Arc::clone(state), optional_auth))
}

/// Create the gateway router.
pub fn create_router(ctx: GatewayContext) -> Router {
    let cors = build_cors_layer(&CorsConfig::for_config(&ctx.config));
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(handlers::system::health))
        .route("/status", get(handlers::system::status))
        .route("/mcp/capabilities", get(handlers::system::capabilities))
        .merge(chat_routes(&state))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
