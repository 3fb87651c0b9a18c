//! Logging setup.
//!
//! Everything the `EnvFilter` lets through goes to stdout. ERROR events are
//! also appended to `logs/error.log` together with the request span they
//! happened in, which carries the method and URI. Request headers and bodies
//! are never recorded.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Directory holding persisted logs
pub const LOG_DIR: &str = "logs";

/// File receiving ERROR events
pub const ERROR_LOG_FILE: &str = "error.log";

/// Install the global subscriber with `directive` on top of `RUST_LOG`.
///
/// The returned guard flushes the error log when dropped; hold it until exit.
pub fn init(directive: &str) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .with_context(|| format!("Invalid log directive: {}", directive))?,
    );
    let (error_layer, guard) = error_file_layer(Path::new(LOG_DIR))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(error_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Spans pass so the file layer can print the request context of an event.
fn error_log_filter(metadata: &Metadata<'_>) -> bool {
    metadata.is_span() || *metadata.level() == Level::ERROR
}

/// Layer appending ERROR events to `<dir>/error.log` off the request path.
pub fn error_file_layer<S>(dir: &Path) -> Result<(impl Layer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(ERROR_LOG_FILE)
        .build(dir)
        .with_context(|| format!("Failed to open {}", dir.join(ERROR_LOG_FILE).display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter_fn(error_log_filter));
    Ok((layer, guard))
}
