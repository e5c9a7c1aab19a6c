//! Startup snapshot loading
//!
//! The load phase runs exactly once and must finish before the registry is
//! handed to anything else. The only way to obtain a [`Bootstrapped`] token,
//! which the ingestion pipeline and query service require, is through
//! [`BootstrapLoader::load`].

use crate::core::codec::decode_json;
use crate::core::registry::EnvioRegistry;
use crate::domain::{EcoError, Result, SkippedRow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of the load phase
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Snapshot location that was consulted
    pub path: PathBuf,

    /// Whether a snapshot file was found within the wait
    pub found: bool,

    /// Records loaded into the registry
    pub loaded: usize,

    /// Persisted records rejected by validation
    pub skipped: Vec<SkippedRow>,
}

/// Readiness token: a registry whose load phase has completed
pub struct Bootstrapped {
    registry: Arc<dyn EnvioRegistry>,
    report: BootstrapReport,
}

impl Bootstrapped {
    /// The seeded registry
    pub fn registry(&self) -> Arc<dyn EnvioRegistry> {
        Arc::clone(&self.registry)
    }

    /// What the load phase did
    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }
}

/// Seeds a registry from the last snapshot
#[derive(Debug, Clone)]
pub struct BootstrapLoader {
    path: PathBuf,
    wait: Duration,
}

impl BootstrapLoader {
    /// Creates a loader for `path`, waiting at most `wait` for it to appear
    pub fn new(path: impl Into<PathBuf>, wait: Duration) -> Self {
        Self {
            path: path.into(),
            wait,
        }
    }

    /// Runs the load phase
    ///
    /// An absent snapshot (after the bounded wait) leaves the registry as is.
    /// Records go through [`EnvioRegistry::upsert`], so invalid persisted
    /// records are skipped exactly as during ingestion.
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::MalformedSnapshot`] if the file exists but is not a
    /// valid snapshot, or [`EcoError::Io`] if it exists but cannot be read.
    /// Both are fatal to startup.
    pub async fn load(self, registry: Arc<dyn EnvioRegistry>) -> Result<Bootstrapped> {
        let mut report = BootstrapReport {
            path: self.path.clone(),
            found: false,
            loaded: 0,
            skipped: Vec::new(),
        };

        let bytes = match self.read_with_wait().await? {
            Some(bytes) => bytes,
            None => {
                tracing::info!(
                    path = %self.path.display(),
                    "No snapshot found, registry starts empty"
                );
                return Ok(Bootstrapped { registry, report });
            }
        };
        report.found = true;

        let envios = decode_json(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Snapshot is corrupt");
            e
        })?;

        for (idx, envio) in envios.into_iter().enumerate() {
            let id = envio.id.clone();
            match registry.upsert(envio) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        index = idx,
                        error = %e,
                        "Skipping invalid record in snapshot"
                    );
                    report.skipped.push(SkippedRow::new(idx + 1, id, e.to_string()));
                }
            }
        }

        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "Registry initialized from snapshot"
        );

        Ok(Bootstrapped { registry, report })
    }

    async fn read_with_wait(&self) -> Result<Option<Vec<u8>>> {
        let deadline = Instant::now() + self.wait;

        loop {
            match tokio::fs::read(&self.path).await {
                Ok(bytes) => return Ok(Some(bytes)),
                Err(e) if is_absent(&e) => {}
                Err(e) => {
                    return Err(EcoError::Io(format!(
                        "Failed to read snapshot {}: {}",
                        self.path.display(),
                        e
                    )))
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Snapshot location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A path component that is a regular file means the snapshot cannot exist
fn is_absent(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ShardedRegistry;
    use crate::domain::Envio;
    use tempfile::TempDir;

    fn registry() -> Arc<dyn EnvioRegistry> {
        Arc::new(ShardedRegistry::new())
    }

    #[tokio::test]
    async fn test_missing_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let loader = BootstrapLoader::new(dir.path().join("envios.json"), Duration::ZERO);

        let ready = loader.load(registry()).await.unwrap();
        assert!(!ready.report().found);
        assert!(ready.registry().is_empty());
    }

    #[tokio::test]
    async fn test_loads_snapshot_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");
        std::fs::write(
            &path,
            r#"[{"id":"S1","cliente":"Ana","direccion":"Calle 1","estado":"enviado"}]"#,
        )
        .unwrap();

        let ready = BootstrapLoader::new(&path, Duration::ZERO)
            .load(registry())
            .await
            .unwrap();

        assert!(ready.report().found);
        assert_eq!(ready.report().loaded, 1);
        assert_eq!(
            ready.registry().find_by_id("S1"),
            Some(Envio::new("S1", "Ana", "Calle 1", "enviado"))
        );
    }

    #[tokio::test]
    async fn test_invalid_persisted_records_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");
        std::fs::write(
            &path,
            r#"[{"id":" ","cliente":"Eve","direccion":"","estado":""},
                {"id":"S1","cliente":"Ana","direccion":"Calle 1","estado":"enviado"}]"#,
        )
        .unwrap();

        let ready = BootstrapLoader::new(&path, Duration::ZERO)
            .load(registry())
            .await
            .unwrap();

        assert_eq!(ready.report().loaded, 1);
        assert_eq!(ready.report().skipped.len(), 1);
        assert_eq!(ready.report().skipped[0].row, 1);
    }

    #[tokio::test]
    async fn test_snapshot_under_regular_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let ready = BootstrapLoader::new(blocker.join("envios.json"), Duration::ZERO)
            .load(registry())
            .await
            .unwrap();
        assert!(!ready.report().found);
        assert!(ready.registry().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");
        std::fs::write(&path, b"[{\"id\":\"S1\",").unwrap();

        let result = BootstrapLoader::new(&path, Duration::ZERO)
            .load(registry())
            .await;
        assert!(matches!(result, Err(EcoError::MalformedSnapshot(_))));
    }

    #[tokio::test]
    async fn test_waits_for_late_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");

        let late = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let envios = [Envio::new("S9", "Zoe", "Calle 9", "enviado")];
            crate::core::snapshot::write_snapshot(&late, &envios)
                .await
                .unwrap();
        });

        let ready = BootstrapLoader::new(&path, Duration::from_secs(5))
            .load(registry())
            .await
            .unwrap();
        assert!(ready.registry().find_by_id("S9").is_some());
    }
}
