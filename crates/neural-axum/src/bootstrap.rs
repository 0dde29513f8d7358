//! Gateway bootstrap - the composition root.
//!
//! Wires configuration to the completion forwarder and runs the HTTP server
//! until the cancellation token fires.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use neural_core::{CompletionPort, Environment, GatewayConfig};
use neural_proxy::ChatForwarder;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long in-flight requests get to finish after shutdown is requested.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// CORS configuration for the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// Development allows everything. Production allows the configured
    /// origins unless the list contains `*`.
    pub fn for_config(config: &GatewayConfig) -> Self {
        match config.environment {
            Environment::Development => Self::AllowAll,
            Environment::Production if config.allows_any_origin() => Self::AllowAll,
            Environment::Production => Self::AllowOrigins(config.allowed_origins.clone()),
        }
    }
}

/// Context holding everything the handlers need.
pub struct GatewayContext {
    pub config: Arc<GatewayConfig>,
    /// Downstream completion port.
    pub completions: Arc<dyn CompletionPort>,
    /// Process start, for `/status` uptime.
    pub started_at: Instant,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig, completions: Arc<dyn CompletionPort>) -> Self {
        Self {
            config: Arc::new(config),
            completions,
            started_at: Instant::now(),
        }
    }
}

/// Validate configuration and build the production context.
pub fn bootstrap(config: GatewayConfig) -> Result<GatewayContext> {
    config.validate().context("invalid gateway configuration")?;

    let forwarder =
        ChatForwarder::new(&config).context("failed to build downstream HTTP client")?;

    info!(
        environment = config.environment.as_str(),
        llm_endpoint = %config.llm_endpoint,
        model = %config.model_name,
        require_auth = config.require_auth,
        "Gateway context initialized"
    );

    Ok(GatewayContext::new(config, Arc::new(forwarder)))
}

/// Serve the gateway on an already-bound listener until `cancel` fires.
///
/// Peer addresses are exposed to handlers through `ConnectInfo`.
pub async fn serve(
    listener: TcpListener,
    ctx: GatewayContext,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let app = crate::routes::create_router(ctx);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(cancel.cancelled_owned())
    .await
}

/// Start the gateway on `0.0.0.0:{config.port}`.
///
/// Returns once the server has drained after cancellation, or after
/// [`SHUTDOWN_GRACE`] if in-flight requests do not finish in time.
pub async fn start_server(config: GatewayConfig, cancel: CancellationToken) -> Result<()> {
    let ctx = bootstrap(config)?;

    let addr = format!("0.0.0.0:{}", ctx.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        address = %addr,
        environment = ctx.config.environment.as_str(),
        "Neural gateway listening on http://{}", addr
    );

    let mut server = tokio::spawn(serve(listener, ctx, cancel.clone()));

    tokio::select! {
        joined = &mut server => {
            // Server exited on its own, before any shutdown request.
            return joined.context("server task panicked")?.context("server error");
        }
        () = cancel.cancelled() => {
            info!("Shutting down server...");
        }
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
        Ok(joined) => {
            joined.context("server task panicked")?.context("server error")?;
            info!("Server exited");
        }
        Err(_) => {
            warn!(
                grace_secs = SHUTDOWN_GRACE.as_secs(),
                "Server forced to shutdown after grace period"
            );
            server.abort();
        }
    }

    Ok(())
}
