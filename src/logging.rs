//! File-based logging.
//!
//! The terminal belongs to the TUI, so `tracing` output goes to a daily
//! rotating file instead of stdout.

use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_state_dir};

const LOG_FILE_PREFIX: &str = "spindle.log";

/// Directory the log file goes to: `logging.dir`, else the XDG state dir,
/// else `./.logs`.
pub fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings
        .dir
        .clone()
        .or_else(default_state_dir)
        .unwrap_or_else(|| PathBuf::from(".logs"))
}

/// Install the global subscriber. Keep the returned guard alive until exit;
/// dropping it flushes pending lines.
///
/// `RUST_LOG` takes precedence over `logging.filter`.
pub fn init(settings: &LoggingSettings) -> io::Result<WorkerGuard> {
    let dir = log_dir(settings);
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("spindle=info,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}
