//! Two-phase runtime assembly
//!
//! Load phase: the bootstrap loader seeds a fresh registry from the last
//! snapshot. Serve phase: only after that, the snapshot writer is spawned and
//! the pipeline and query service are built from the readiness token.

use crate::config::EcoConfig;
use crate::core::ingest::{InboxWatcher, IngestionPipeline};
use crate::core::query::EnvioService;
use crate::core::registry::{EnvioRegistry, ShardedRegistry};
use crate::core::snapshot::{BootstrapLoader, BootstrapReport, SnapshotWriter};
use crate::domain::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A started EcoLogistics core
pub struct EnvioRuntime {
    config: EcoConfig,
    registry: Arc<dyn EnvioRegistry>,
    pipeline: Arc<IngestionPipeline>,
    service: EnvioService,
    snapshots: SnapshotWriter,
    worker: JoinHandle<()>,
    bootstrap: BootstrapReport,
}

impl EnvioRuntime {
    /// Run the load phase, then bring up the serve-phase components
    ///
    /// # Errors
    ///
    /// Returns the bootstrap error if the snapshot exists but is corrupt or
    /// unreadable. The caller is expected to abort startup.
    pub async fn start(config: &EcoConfig) -> Result<Self> {
        let snapshot_path = config.paths.snapshot_path();

        let ready = BootstrapLoader::new(&snapshot_path, config.bootstrap.wait())
            .load(Arc::new(ShardedRegistry::new()))
            .await?;

        let registry = ready.registry();
        let (snapshots, worker) = SnapshotWriter::spawn(Arc::clone(&registry), &snapshot_path);

        let mut pipeline = IngestionPipeline::new(&ready, snapshots.clone());
        if config.ingest.write_file_output {
            pipeline = pipeline.with_file_output(&config.paths.output_dir);
        }
        let service = EnvioService::new(&ready, snapshots.clone());

        tracing::info!(
            snapshot = %snapshot_path.display(),
            records = registry.len(),
            "Registry ready"
        );

        Ok(Self {
            config: config.clone(),
            registry,
            pipeline: Arc::new(pipeline),
            service,
            snapshots,
            worker,
            bootstrap: ready.report().clone(),
        })
    }

    /// The shared registry
    pub fn registry(&self) -> Arc<dyn EnvioRegistry> {
        Arc::clone(&self.registry)
    }

    /// The ingestion pipeline
    pub fn pipeline(&self) -> Arc<IngestionPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// The query service
    pub fn service(&self) -> EnvioService {
        self.service.clone()
    }

    /// The snapshot writer handle
    pub fn snapshots(&self) -> &SnapshotWriter {
        &self.snapshots
    }

    /// What the load phase did
    pub fn bootstrap_report(&self) -> &BootstrapReport {
        &self.bootstrap
    }

    /// An inbox watcher feeding this runtime's pipeline
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the include pattern is invalid.
    pub fn inbox_watcher(&self) -> Result<InboxWatcher> {
        InboxWatcher::new(self.pipeline(), &self.config)
    }

    /// Persist pending state and stop the snapshot writer
    pub async fn shutdown(self) {
        self.snapshots.stop().await;
        if let Err(e) = self.worker.await {
            tracing::error!(error = %e, "Snapshot writer task failed");
        }
        tracing::info!("Runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EcoError, Envio};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> EcoConfig {
        let mut config = EcoConfig::default();
        config.paths.inbox_dir = dir.path().join("input").to_string_lossy().into_owned();
        config.paths.archive_dir = dir.path().join("archived").to_string_lossy().into_owned();
        config.paths.output_dir = dir.path().join("output").to_string_lossy().into_owned();
        config.bootstrap.wait_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_start_empty_and_restart_with_state() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let runtime = EnvioRuntime::start(&config).await.unwrap();
        assert!(!runtime.bootstrap_report().found);
        runtime
            .service()
            .create(Envio::new("S1", "Ana", "Calle 1", "enviado"))
            .unwrap();
        runtime.shutdown().await;

        let restarted = EnvioRuntime::start(&config).await.unwrap();
        assert!(restarted.bootstrap_report().found);
        assert_eq!(
            restarted.registry().find_by_id("S1"),
            Some(Envio::new("S1", "Ana", "Calle 1", "enviado"))
        );
        restarted.shutdown().await;
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_aborts_start() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::create_dir_all(&config.paths.output_dir).unwrap();
        std::fs::write(config.paths.snapshot_path(), b"{ not an array").unwrap();

        let result = EnvioRuntime::start(&config).await;
        assert!(matches!(result, Err(EcoError::MalformedSnapshot(_))));
    }
}
