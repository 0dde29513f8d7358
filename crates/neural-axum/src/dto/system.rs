//! Liveness, status and capability DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Gateway release reported by `/health`.
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol version reported by `/mcp/capabilities`.
pub const CAPABILITIES_VERSION: &str = "1.0";

/// `/health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub model: String,
}

impl HealthResponse {
    pub fn healthy(model: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
            version: GATEWAY_VERSION,
            model: model.into(),
        }
    }
}

/// `/status` body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub model: String,
    /// Time since startup, e.g. `1h2m3s`.
    pub uptime: String,
    pub llm_health: bool,
}

/// `/mcp/capabilities` body.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitiesResponse {
    pub version: &'static str,
    pub capabilities: Vec<&'static str>,
}

impl Default for CapabilitiesResponse {
    fn default() -> Self {
        Self {
            version: CAPABILITIES_VERSION,
            capabilities: vec!["chat", "completion"],
        }
    }
}
