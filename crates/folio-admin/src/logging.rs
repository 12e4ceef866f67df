use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name inside the cache directory
const LOG_FILE: &str = "folio-admin.log";

/// Use RUST_LOG to control the level (e.g. RUST_LOG=folio_core=debug)
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logging for one-shot commands: everything goes to stderr so stdout
/// stays clean for command output.
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter())
        .init();
}

/// Logging for the dashboard, which owns the terminal. Logs go to a daily
/// rotated file; keep the returned guard alive until exit so buffered lines
/// are flushed.
pub fn init_file(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true),
        )
        .with(env_filter())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(guard)
}
