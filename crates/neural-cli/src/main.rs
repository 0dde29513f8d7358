//! CLI entry point - the composition root.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use neural_cli::{Cli, Commands, init_logging, render_config};
use neural_core::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let (mut config, fallbacks) = GatewayConfig::from_env();

    match cli.command_or_default() {
        Commands::Config => {
            print!("{}", render_config(&config));
            for fallback in &fallbacks {
                eprintln!("warning: {fallback}");
            }
            Ok(())
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }

            let _log_guard = init_logging(&config)?;
            for fallback in &fallbacks {
                warn!(key = fallback.key, value = %fallback.value, "Invalid value, using default");
            }
            info!(?config, "Starting neural gateway");

            let cancel = CancellationToken::new();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    shutdown_signal().await;
                    cancel.cancel();
                }
            });

            neural_axum::start_server(config, cancel).await
        }
    }
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}
