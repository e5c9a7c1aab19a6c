//! Tracing setup and the ingestion log macros
//!
//! ```no_run
//! use ecologistics::config::LoggingConfig;
//! use ecologistics::logging::init_logging;
//!
//! let _guard = init_logging("debug", &LoggingConfig::default()).unwrap();
//! tracing::info!(file = "envios.csv", "Claimed");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a file ingestion
///
/// # Example
///
/// ```no_run
/// use ecologistics::log_ingest_start;
///
/// log_ingest_start!("envios.csv", 120);
/// ```
#[macro_export]
macro_rules! log_ingest_start {
    ($file:expr, $rows:expr) => {
        tracing::info!(file = %$file, rows = $rows, "Starting ingestion");
    };
}

/// Log the completion of a file ingestion
///
/// # Example
///
/// ```no_run
/// use ecologistics::log_ingest_complete;
/// use std::time::Duration;
///
/// log_ingest_complete!("envios.csv", 118, Duration::from_millis(4));
/// ```
#[macro_export]
macro_rules! log_ingest_complete {
    ($file:expr, $count:expr, $duration:expr) => {
        tracing::debug!(
            file = %$file,
            upserted = $count,
            duration_ms = $duration.as_millis() as u64,
            "Records applied to registry"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ecologistics::log_error_with_context;
/// use ecologistics::domain::EcoError;
///
/// let error = EcoError::MalformedCsv("bad quoting".to_string());
/// log_error_with_context!(&error, "envios.csv");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
