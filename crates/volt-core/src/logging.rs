//! File logging setup.
//!
//! The TUI owns the terminal, so log output goes to
//! `$VOLT_HOME/logs/volt.log` through a non-blocking appender.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Environment variable holding an `EnvFilter` directive (e.g. `volt_core=debug`).
pub const LOG_ENV: &str = "VOLT_LOG";

/// File name of the log inside the logs directory.
pub const LOG_FILE_NAME: &str = "volt.log";

/// Maps the `-v` count to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbose: u8) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(directives.trim()).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
        _ => EnvFilter::new(level_for_verbosity(verbose)),
    }
}

/// Installs the global subscriber writing to `logs_dir`.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the lifetime of the process.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(logs_dir: &Path, verbose: u8) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::NEVER, logs_dir, LOG_FILE_NAME);
    let (writer, guard) = NonBlocking::new(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = Registry::default()
        .with(build_filter(verbose))
        .with(file_layer)
        .try_init();

    Ok(guard)
}
