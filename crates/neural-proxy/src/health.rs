//! Reachability probe for the downstream llama-server.
//!
//! This module is intentionally minimal and has no domain logic.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// Upper bound for a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Check whether anything answers HTTP at `url`.
///
/// Makes a single GET request. Any response counts, 404 included: the
/// downstream exposes no health route at its base URL, so only transport
/// failures mean it is down.
pub async fn probe_endpoint(client: &Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            debug!(endpoint = %url, status = %response.status(), "LLM probe answered");
            true
        }
        Err(e) => {
            debug!(endpoint = %url, error = %e, "LLM health check failed");
            false
        }
    }
}
