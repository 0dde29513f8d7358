//! Liveness, status and capability handlers. None of these require auth.

use std::time::Duration;

use axum::Json;
use axum::extract::State;

use crate::dto::{CapabilitiesResponse, HealthResponse, StatusResponse};
use crate::state::AppState;

/// Liveness check. Never touches the downstream.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.config.model_name.clone()))
}

/// Gateway status including a live downstream probe.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let llm_health = state.completions.is_reachable().await;

    Json(StatusResponse {
        status: "online",
        model: state.config.model_name.clone(),
        uptime: format_uptime(state.started_at.elapsed()),
        llm_health,
    })
}

/// Static capability list.
pub async fn capabilities() -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse::default())
}

/// Format whole seconds as `1h2m3s`, dropping leading zero units.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
