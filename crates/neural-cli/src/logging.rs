//! Tracing subscriber setup.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use neural_core::{Environment, GatewayConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL`. Production logs are JSON lines. The
/// returned guard flushes buffered lines on drop and must outlive the server.
pub fn init_logging(config: &GatewayConfig) -> anyhow::Result<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let file = config.log_file.as_deref().and_then(|path| {
        open_log_file(path)
            .map_err(|e| {
                eprintln!(
                    "Failed to open log file {}: {e}; logging to stdout",
                    path.display()
                );
            })
            .ok()
    });
    let to_file = file.is_some();
    let (writer, guard) = match file {
        Some(file) => tracing_appender::non_blocking(file),
        None => tracing_appender::non_blocking(io::stdout()),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?,
        Environment::Development => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(!to_file)
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(guard)
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
