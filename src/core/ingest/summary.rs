//! Ingestion summary and reporting

use crate::domain::SkippedRow;
use std::time::Duration;

/// Outcome of ingesting one file
#[derive(Debug, Clone)]
pub struct IngestSummary {
    /// Name of the ingested file
    pub file: String,

    /// Data rows decoded from the file (header excluded)
    pub rows_decoded: usize,

    /// Records accepted by the registry
    pub upserted: usize,

    /// Rows rejected by validation
    pub skipped: Vec<SkippedRow>,

    /// Time spent ingesting
    pub duration: Duration,
}

impl IngestSummary {
    /// Create an empty summary for `file`
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            rows_decoded: 0,
            upserted: 0,
            skipped: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a skipped row
    pub fn add_skipped(&mut self, skipped: SkippedRow) {
        self.skipped.push(skipped);
    }

    /// Check if every decoded row was accepted
    pub fn is_successful(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            file = %self.file,
            rows = self.rows_decoded,
            upserted = self.upserted,
            skipped = self.skipped.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Ingestion completed"
        );

        for skipped in &self.skipped {
            tracing::warn!(
                file = %self.file,
                row = skipped.row,
                envio_id = %skipped.envio_id,
                reason = %skipped.reason,
                "Row skipped"
            );
        }
    }
}
