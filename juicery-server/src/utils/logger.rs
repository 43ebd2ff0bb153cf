//! Logging Infrastructure
//!
//! Structured logging for development (pretty stdout) and production (JSON,
//! optionally to daily rolling files).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logger with stdout output at `info`
pub fn init_logger() -> Option<WorkerGuard> {
    init_logger_with_file(None, false, None)
}

/// Initialize the logger with optional JSON format and file output
///
/// `RUST_LOG` takes precedence over `log_level`. When `log_dir` exists, output
/// goes to `<log_dir>/juicery-server.<date>`; keep the returned guard alive
/// for the lifetime of the process so buffered lines are flushed.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&str>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match log_dir {
        Some(dir) if Path::new(dir).is_dir() => {
            let file_appender = tracing_appender::rolling::daily(dir, "juicery-server");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        _ => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(writer))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
    guard
}
