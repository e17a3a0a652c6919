use crate::error::AppError;
use std::fs;
use std::io::stderr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "sleeper_tiers.log";
const DEFAULT_DIRECTIVE: &str = "sleeper_tiers=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Sets up logging to a daily rolling file in `log_dir`, and to stderr as well
/// when `verbose` is set. Console output otherwise stays reserved for the user.
///
/// The returned guard must be kept alive for the duration of the program so
/// buffered log lines get flushed.
pub fn setup_logging(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, AppError> {
    fs::create_dir_all(log_dir).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter());

    let console_layer = verbose.then(|| {
        fmt::Layer::new()
            .with_writer(stderr)
            .with_ansi(true)
            .with_filter(filter())
    });

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(guard)
}
