//! Subscriber installation
//!
//! Console output always; JSON lines under `local_path` when
//! `logging.local_enabled` is set.

use crate::config::LoggingConfig;
use crate::domain::{EcoError, Result};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "ecologistics.log";

/// Keeps the file writer alive; buffered lines are flushed on drop
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard(Option<WorkerGuard>);

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Install the global subscriber
///
/// `RUST_LOG`, when set, replaces the `ecologistics=<level>` default filter.
///
/// # Errors
///
/// [`EcoError::Configuration`] for an unknown level, an unusable log
/// directory, or when a subscriber is already installed.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ecologistics={level}")))
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_filter(filter())
        .boxed();

    let (file, guard) = if config.local_enabled {
        let (layer, guard) = json_file_layer(config)?;
        (Some(layer.with_filter(filter()).boxed()), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| EcoError::Configuration(format!("Logging already initialized: {e}")))?;

    tracing::debug!(
        file_logging = config.local_enabled,
        dir = %config.local_path,
        rotation = %config.local_rotation,
        "Logging ready"
    );
    Ok(LoggingGuard(guard))
}

fn json_file_layer<S>(config: &LoggingConfig) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let dir = Path::new(&config.local_path);
    std::fs::create_dir_all(dir).map_err(|e| {
        EcoError::Configuration(format!("Cannot create log directory {}: {e}", dir.display()))
    })?;

    let rotation = if config.local_rotation == "hourly" {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    };
    let (writer, guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(rotation, dir, LOG_FILE_PREFIX));

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(writer)
        .boxed();
    Ok((layer, guard))
}

fn parse_log_level(level: &str) -> Result<Level> {
    let parsed = match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            return Err(EcoError::Configuration(format!(
                "Invalid log level '{level}' (expected trace, debug, info, warn or error)"
            )))
        }
    };
    Ok(parsed)
}
