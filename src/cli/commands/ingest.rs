//! Ingest command implementation
//!
//! Ingests a single CSV file outside the inbox flow and waits for the
//! resulting snapshot to be written before exiting.

use super::load_or_default;
use crate::core::runtime::EnvioRuntime;
use clap::Args;
use std::path::Path;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// CSV file to ingest
    pub file: String,
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let path = Path::new(&self.file);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone());

        let runtime = match EnvioRuntime::start(&config).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Bootstrap failed, aborting startup");
                eprintln!("Failed to load snapshot: {e}");
                return Ok(3);
            }
        };

        println!("📥 Ingesting {}", self.file);
        println!();

        let summary = match runtime.pipeline().ingest_file(path, &name).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(file = %self.file, error = %e, "Ingestion failed");
                eprintln!("Ingestion failed: {e}");
                runtime.shutdown().await;
                return Ok(5);
            }
        };

        runtime.snapshots().flush().await;
        let snapshot_error = runtime.snapshots().last_error();
        let total = runtime.registry().len();
        runtime.shutdown().await;

        println!("📊 Ingestion Summary:");
        println!("  File: {}", summary.file);
        println!("  Rows: {}", summary.rows_decoded);
        println!("  Upserted: {}", summary.upserted);
        println!("  Skipped: {}", summary.skipped.len());
        println!("  Registry Size: {total}");
        println!("  Duration: {:.3}s", summary.duration.as_secs_f64());
        println!();

        if !summary.skipped.is_empty() {
            println!("⚠️  Skipped rows:");
            for skipped in &summary.skipped {
                println!(
                    "  - row {} (id '{}'): {}",
                    skipped.row, skipped.envio_id, skipped.reason
                );
            }
            println!();
        }

        if let Some(err) = snapshot_error {
            println!("⚠️  Snapshot write failed: {err}");
            println!();
        }

        if summary.is_successful() {
            println!("✅ Ingestion completed successfully!");
            Ok(0)
        } else {
            println!("⚠️  Ingestion completed with skipped rows");
            Ok(1)
        }
    }
}
