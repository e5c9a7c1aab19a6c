//! Domain error types
//!
//! This module defines the error hierarchy for EcoLogistics.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main EcoLogistics error type
///
/// This is the primary error type used throughout the application.
/// Per-record and per-file variants are recovered locally by the ingestion
/// pipeline; only bootstrap corruption is allowed to halt the process.
#[derive(Debug, Error)]
pub enum EcoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A shipment record that cannot be stored (empty or blank id)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A CSV payload that could not be parsed into rows
    #[error("Malformed CSV: {0}")]
    MalformedCsv(String),

    /// A snapshot document that is not an array of shipment records
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl EcoError {
    /// Whether the error only affects the record or file being processed
    pub fn is_isolated(&self) -> bool {
        matches!(
            self,
            EcoError::InvalidRecord(_) | EcoError::MalformedCsv(_) | EcoError::Io(_)
        )
    }
}

/// Details of a row skipped during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number within the file (header excluded)
    pub row: usize,

    /// Shipment id as read from the row (may be blank)
    pub envio_id: String,

    /// Reason the row was skipped
    pub reason: String,
}

impl SkippedRow {
    /// Creates a new skipped-row detail
    pub fn new(row: usize, envio_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            row,
            envio_id: envio_id.into(),
            reason: reason.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for EcoError {
    fn from(err: std::io::Error) -> Self {
        EcoError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EcoError {
    fn from(err: serde_json::Error) -> Self {
        EcoError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EcoError {
    fn from(err: toml::de::Error) -> Self {
        EcoError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv reader errors
impl From<csv::Error> for EcoError {
    fn from(err: csv::Error) -> Self {
        EcoError::MalformedCsv(err.to_string())
    }
}
