//! CSV ingestion
//!
//! This module provides:
//! - [`IngestionPipeline`] - decode, upsert and snapshot trigger per file
//! - [`InboxWatcher`] - inbox polling and archiving in front of the pipeline
//! - [`IngestSummary`] - per-file outcome reporting

pub mod inbox;
pub mod pipeline;
pub mod summary;

pub use inbox::{archive_name, InboxWatcher};
pub use pipeline::{output_file_name, IngestionPipeline};
pub use summary::IngestSummary;
