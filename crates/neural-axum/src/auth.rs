//! Bearer-token auth gate.
//!
//! [`evaluate`] is the only place the admission rules live. The two axum
//! middlewares, [`optional_auth`] and [`required_auth`], differ only in the
//! [`AuthMode`] they pass in.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use neural_core::GatewayConfig;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::state::AppState;

/// How the gate treats a missing `API_KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Enforce only when `REQUIRE_AUTH` is set. Fail open when no key is
    /// configured.
    Optional,
    /// Always enforce. A missing key is a server configuration error.
    Mandatory,
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    InvalidFormat,
    InvalidKey,
    ConfigError,
}

impl AuthRejection {
    /// Machine-readable code returned to the client.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingHeader => "MISSING_AUTH_HEADER",
            Self::InvalidFormat => "INVALID_AUTH_FORMAT",
            Self::InvalidKey => "INVALID_API_KEY",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header required",
            Self::InvalidFormat => "Invalid Authorization header format. Expected: Bearer <token>",
            Self::InvalidKey => "Invalid API key",
            Self::ConfigError => "Server configuration error",
        }
    }
}

#[derive(Serialize)]
struct RejectionBody {
    error: &'static str,
    code: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            error: self.message(),
            code: self.code(),
        };
        let mut response = (self.status(), axum::Json(body)).into_response();
        if self.status() == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Continue. `authenticated` is true when a bearer token was verified.
    Admit { authenticated: bool },
    /// Auth is required but no key is configured; continue anyway.
    WarnAndAdmit,
    /// Stop and answer with the rejection.
    Reject(AuthRejection),
}

/// Decide whether a request with the given `Authorization` value is admitted.
///
/// An empty header value counts as absent.
pub fn evaluate(config: &GatewayConfig, authorization: Option<&str>, mode: AuthMode) -> AuthDecision {
    let expected = match (mode, config.api_key.as_deref()) {
        (AuthMode::Optional, _) if !config.require_auth => {
            return AuthDecision::Admit {
                authenticated: false,
            };
        }
        (AuthMode::Optional, None) => return AuthDecision::WarnAndAdmit,
        (AuthMode::Mandatory, None) => return AuthDecision::Reject(AuthRejection::ConfigError),
        (_, Some(key)) => key,
    };

    match check_bearer(authorization.filter(|v| !v.is_empty()), expected) {
        Ok(()) => AuthDecision::Admit {
            authenticated: true,
        },
        Err(rejection) => AuthDecision::Reject(rejection),
    }
}

fn check_bearer(authorization: Option<&str>, expected: &str) -> Result<(), AuthRejection> {
    let value = authorization.ok_or(AuthRejection::MissingHeader)?;
    let token = match value.split_once(' ') {
        Some(("Bearer", token)) => token,
        _ => return Err(AuthRejection::InvalidFormat),
    };
    if token != expected {
        return Err(AuthRejection::InvalidKey);
    }
    Ok(())
}

/// Request annotation attached by the gate for downstream logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub authenticated: bool,
    pub client_ip: String,
    pub user_agent: Option<String>,
}

/// Best-effort client address: socket peer, then `X-Forwarded-For`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(addr) = peer {
        return addr.ip().to_string();
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}

/// Gate that enforces auth only when `REQUIRE_AUTH` is set.
pub async fn optional_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gate(&state, AuthMode::Optional, req, next).await
}

/// Gate that always enforces auth and never fails open.
pub async fn required_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gate(&state, AuthMode::Mandatory, req, next).await
}

async fn gate(state: &AppState, mode: AuthMode, mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = client_ip(req.headers(), peer);
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let authenticated = match evaluate(&state.config, authorization, mode) {
        AuthDecision::Admit { authenticated } => {
            if authenticated {
                debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    client_ip = %client_ip,
                    "Authentication successful"
                );
            }
            authenticated
        }
        AuthDecision::WarnAndAdmit => {
            warn!("Authentication required but no API key configured");
            false
        }
        AuthDecision::Reject(AuthRejection::ConfigError) => {
            error!("API key not configured but authentication required");
            return AuthRejection::ConfigError.into_response();
        }
        AuthDecision::Reject(rejection) => {
            warn!(
                method = %req.method(),
                path = %req.uri().path(),
                client_ip = %client_ip,
                code = rejection.code(),
                "Request rejected by auth gate"
            );
            return rejection.into_response();
        }
    };

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    req.extensions_mut().insert(AuthInfo {
        authenticated,
        client_ip,
        user_agent,
    });

    next.run(req).await
}
