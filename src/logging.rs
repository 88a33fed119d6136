//! Tracing subscriber setup for the binary.
//!
//! One-shot commands log to stderr. The interactive editor owns the terminal, so it only
//! logs when a log file is configured.

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// The returned guard flushes the log file when dropped, so keep it alive until exit.
///
/// # Errors
///
/// Returns [`Error::Io`] if the configured log file cannot be created.
pub fn init(cfg: &Config, interactive: bool) -> Result<Option<WorkerGuard>> {
    let level = parse_level(&cfg.log_level).unwrap_or(LevelFilter::INFO);

    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter(level))
    });

    let (file_layer, guard) = match cfg.log_file.as_deref() {
        Some(path) => {
            let file = File::create(path).map_err(|source| Error::Io {
                path: Path::new(path).to_path_buf(),
                source,
            })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

fn filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Maps a level name, in any case, to a filter.
#[must_use]
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
