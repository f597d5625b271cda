//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/hostdeck/logs/` since the TUI owns
/// stdout. Log level is controlled by the `HOSTDECK_LOG` environment variable.
///
/// # Examples
/// ```bash
/// HOSTDECK_LOG=debug cargo run
/// HOSTDECK_LOG=trace cargo run
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hostdeck.log");

    // Default to info for our crates, allow override via HOSTDECK_LOG
    let env_filter = EnvFilter::try_from_env("HOSTDECK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(
            "warn,hostdeck=info,hostdeck_core=info,hostdeck_client=info,hostdeck_app=info,hostdeck_tui=info",
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("HostDeck starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hostdeck").join("logs")
}

/// Get the log file path for the current day
pub fn current_log_file() -> PathBuf {
    log_directory().join("hostdeck.log")
}
