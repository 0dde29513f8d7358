//! Shared application state type.

use crate::bootstrap::GatewayContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// An Arc-wrapped [`GatewayContext`] holding the configuration and the
/// completion port.
pub type AppState = Arc<GatewayContext>;
