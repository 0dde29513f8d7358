//! HTTP and WebSocket handlers.
//!
//! Handlers are thin: they decode, delegate to the completion port and map
//! errors to [`HttpError`](crate::error::HttpError).

pub mod chat;
pub mod session;
pub mod system;
