//! Ingestion pipeline - turns one CSV file into registry upserts
//!
//! Stages, each failing in isolation:
//! 1. decode the CSV (a parse failure aborts this file only, registry untouched)
//! 2. upsert records in file order (an invalid record skips that row only)
//! 3. trigger a snapshot write of the whole registry (fire-and-forget)

use crate::core::codec::{decode_csv, parse_csv};
use crate::core::ingest::summary::IngestSummary;
use crate::core::registry::EnvioRegistry;
use crate::core::snapshot::{write_snapshot, Bootstrapped, SnapshotWriter};
use crate::domain::{EcoError, Envio, Result, SkippedRow};
use crate::{log_error_with_context, log_ingest_complete, log_ingest_start};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Ingestion pipeline
///
/// Batches are applied row by row: a concurrent reader may observe a file
/// half-applied, since distinct shipment ids carry no cross-row consistency.
pub struct IngestionPipeline {
    registry: Arc<dyn EnvioRegistry>,
    snapshots: SnapshotWriter,
    file_output_dir: Option<PathBuf>,
}

impl IngestionPipeline {
    /// Create a pipeline over a bootstrapped registry
    pub fn new(ready: &Bootstrapped, snapshots: SnapshotWriter) -> Self {
        Self {
            registry: ready.registry(),
            snapshots,
            file_output_dir: None,
        }
    }

    /// Also write `<dir>/<stem>.json` with the records decoded from each file
    pub fn with_file_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_output_dir = Some(dir.into());
        self
    }

    /// Ingestion trigger: apply already-parsed CSV rows from `file`
    ///
    /// Row 0 is the header. Never fails; rejected rows are reported in the
    /// returned summary.
    pub fn ingest_rows(&self, file: &str, rows: &[Vec<String>]) -> IngestSummary {
        let envios = decode_csv(rows);
        self.apply(file, &envios)
    }

    /// Read, parse and ingest the CSV file at `path`, reported as `name`
    ///
    /// `name` is the file's original inbox name; `path` may point at its
    /// archived copy.
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::Io`] if the file cannot be read and
    /// [`EcoError::MalformedCsv`] if it cannot be parsed. In both cases the
    /// registry is not touched.
    pub async fn ingest_file(&self, path: &Path, name: &str) -> Result<IngestSummary> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            EcoError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let rows = parse_csv(&bytes).map_err(|e| {
            log_error_with_context!(&e, name);
            e
        })?;

        let envios = decode_csv(&rows);
        let summary = self.apply(name, &envios);

        if let Some(dir) = &self.file_output_dir {
            self.write_file_output(dir, name, &envios).await;
        }

        Ok(summary)
    }

    fn apply(&self, file: &str, envios: &[Envio]) -> IngestSummary {
        let start = Instant::now();
        log_ingest_start!(file, envios.len());

        let mut summary = IngestSummary::new(file);
        summary.rows_decoded = envios.len();

        for (idx, envio) in envios.iter().enumerate() {
            let id = envio.id.clone();
            match self.registry.upsert(envio.clone()) {
                Ok(()) => summary.upserted += 1,
                Err(e) => {
                    tracing::debug!(file, row = idx + 1, error = %e, "Skipping invalid row");
                    summary.add_skipped(SkippedRow::new(idx + 1, id, e.to_string()));
                }
            }
        }

        self.snapshots.trigger();

        let summary = summary.with_duration(start.elapsed());
        log_ingest_complete!(file, summary.upserted, summary.duration);
        summary.log_summary();
        summary
    }

    async fn write_file_output(&self, dir: &Path, name: &str, envios: &[Envio]) {
        let target = dir.join(output_file_name(name));
        if same_location(&target, self.snapshots.path()).await {
            tracing::warn!(file = name, path = %target.display(), "File output would replace the snapshot, skipping");
            return;
        }
        match write_snapshot(&target, envios).await {
            Ok(bytes) => {
                tracing::info!(file = name, path = %target.display(), bytes, "File output written");
            }
            Err(e) => {
                tracing::warn!(file = name, path = %target.display(), error = %e, "Failed to write file output");
            }
        }
    }
}

/// Whether two paths name the same file once `..` and symlinks are resolved
async fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (resolve(a).await, resolve(b).await) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Canonical form of `path`, resolving through the parent when the file does
/// not exist yet
async fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = tokio::fs::canonicalize(path).await {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tokio::fs::canonicalize(parent)
        .await
        .ok()
        .map(|dir| dir.join(name))
}

/// `<stem>.json` for an input file name
pub fn output_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{stem}.json")
}
