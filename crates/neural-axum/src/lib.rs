#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies only used by the integration tests under tests/
#[cfg(test)]
use futures_util as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_tungstenite as _;

pub mod auth;
pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use auth::{AuthDecision, AuthInfo, AuthMode, AuthRejection, optional_auth, required_auth};
pub use bootstrap::{
    CorsConfig, GatewayContext, SHUTDOWN_GRACE, bootstrap, serve, start_server,
};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
