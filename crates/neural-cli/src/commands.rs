//! Subcommands and their pure helpers.

use std::fmt::Write as _;

use clap::Subcommand;
use neural_core::GatewayConfig;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the gateway (default)
    Serve {
        /// Listen port, overriding PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration with the API key redacted
    Config,
}

/// Render the effective configuration as `KEY=value` lines.
pub fn render_config(config: &GatewayConfig) -> String {
    let api_key = if config.api_key.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    };
    let log_file = config
        .log_file
        .as_ref()
        .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string());

    let rows: [(&str, String); 12] = [
        ("PORT", config.port.to_string()),
        ("ENVIRONMENT", config.environment.as_str().to_string()),
        ("LLM_ENDPOINT", config.llm_endpoint.clone()),
        ("MODEL_NAME", config.model_name.clone()),
        ("MAX_TOKENS", config.max_tokens.to_string()),
        ("TEMPERATURE", config.temperature.to_string()),
        ("REQUEST_TIMEOUT", config.request_timeout_secs.to_string()),
        ("API_KEY", api_key.to_string()),
        ("REQUIRE_AUTH", config.require_auth.to_string()),
        ("ALLOWED_ORIGINS", config.allowed_origins.join(",")),
        ("LOG_LEVEL", config.log_level.clone()),
        ("LOG_FILE", log_file),
    ];

    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "{key}={value}");
    }
    out
}
