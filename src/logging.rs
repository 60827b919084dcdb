use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "gym_bro_tron=info,warn";
pub const DEFAULT_LOG_FILE: &str = "log.log";

/// Installs the process-wide logging context: stdout plus an append-only log file.
///
/// `RUST_LOG` overrides the default filter. Calling this twice is an error.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_thread_names(true))
        .with(
            fmt::layer()
                .with_thread_names(true)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Logging was already initialized")?;
    Ok(())
}
