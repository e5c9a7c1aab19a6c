//! Background snapshot writer
//!
//! Triggers are handed to a single worker task through a bounded queue of
//! capacity one. A trigger that finds the queue full is already covered by the
//! pending one, because the worker reads the registry only after dequeuing.
//! The worker always persists the latest registry state, never deltas.

use crate::core::codec::encode_json;
use crate::core::registry::EnvioRegistry;
use crate::domain::{EcoError, Envio, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum Signal {
    Persist,
    Stop,
}

struct WriterState {
    path: PathBuf,
    /// Number of triggers issued so far
    requested: AtomicU64,
    stopped: AtomicBool,
    last_error: Mutex<Option<String>>,
}

/// Handle for scheduling snapshot writes
///
/// Cheap to clone; every clone feeds the same worker, so physical writes are
/// serialized no matter how many callers trigger concurrently.
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::Sender<Signal>,
    state: Arc<WriterState>,
    completed: watch::Receiver<u64>,
}

impl SnapshotWriter {
    /// Spawns the writer worker on the current tokio runtime
    ///
    /// Returns the handle and the worker's join handle. The worker runs until
    /// [`SnapshotWriter::stop`] is called or every handle is dropped.
    pub fn spawn(
        registry: Arc<dyn EnvioRegistry>,
        path: impl Into<PathBuf>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let (completed_tx, completed) = watch::channel(0);
        let state = Arc::new(WriterState {
            path: path.into(),
            requested: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            last_error: Mutex::new(None),
        });

        let worker = tokio::spawn(run_worker(registry, Arc::clone(&state), rx, completed_tx));

        (
            Self {
                tx,
                state,
                completed,
            },
            worker,
        )
    }

    /// Schedules a write of the current registry contents
    ///
    /// Never blocks and never fails: a full queue means a write that will
    /// observe this caller's mutation is already pending.
    pub fn trigger(&self) {
        if self.is_stopped() {
            tracing::warn!(
                path = %self.state.path.display(),
                "Snapshot writer stopped, trigger dropped"
            );
            return;
        }

        self.state.requested.fetch_add(1, Ordering::SeqCst);
        match self.tx.try_send(Signal::Persist) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!("Snapshot write already pending, trigger coalesced");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(
                    path = %self.state.path.display(),
                    "Snapshot writer stopped, trigger dropped"
                );
            }
        }
    }

    /// Waits until every trigger issued before this call has been covered by
    /// a completed write attempt, successful or not
    ///
    /// Returns immediately if the worker has already exited.
    pub async fn flush(&self) {
        let target = self.state.requested.load(Ordering::SeqCst);
        let mut completed = self.completed.clone();
        let _ = completed.wait_for(|done| *done >= target).await;
    }

    /// Flushes pending triggers, then asks the worker to exit
    pub async fn stop(&self) {
        self.flush().await;
        self.state.stopped.store(true, Ordering::SeqCst);
        let _ = self.tx.send(Signal::Stop).await;
    }

    /// Whether [`SnapshotWriter::stop`] has been called on any handle
    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }

    /// Error message of the most recent write attempt, if it failed
    pub fn last_error(&self) -> Option<String> {
        self.state.last_error.lock().clone()
    }

    /// Destination of the snapshot
    pub fn path(&self) -> &Path {
        &self.state.path
    }
}

async fn run_worker(
    registry: Arc<dyn EnvioRegistry>,
    state: Arc<WriterState>,
    mut rx: mpsc::Receiver<Signal>,
    completed: watch::Sender<u64>,
) {
    tracing::debug!(path = %state.path.display(), "Snapshot writer started");

    while let Some(signal) = rx.recv().await {
        if let Signal::Stop = signal {
            break;
        }

        let generation = state.requested.load(Ordering::SeqCst);
        let envios = registry.find_all();

        match write_snapshot(&state.path, &envios).await {
            Ok(bytes) => {
                *state.last_error.lock() = None;
                tracing::info!(
                    path = %state.path.display(),
                    records = envios.len(),
                    bytes,
                    "Snapshot updated"
                );
            }
            Err(e) => {
                // The next trigger retries with fresh state
                *state.last_error.lock() = Some(e.to_string());
                tracing::error!(
                    path = %state.path.display(),
                    error = %e,
                    "Failed to write snapshot"
                );
            }
        }

        completed.send_replace(generation);
    }

    tracing::debug!(path = %state.path.display(), "Snapshot writer stopped");
}

/// Writes `envios` to `path`, replacing the whole file atomically
///
/// The document is written to a sibling temporary file, synced, and renamed
/// over the destination, so readers never observe a partial file. Missing
/// parent directories are created.
///
/// # Errors
///
/// Returns [`EcoError::Io`] on any file system failure; the destination is
/// left untouched in that case.
pub async fn write_snapshot(path: &Path, envios: &[Envio]) -> Result<usize> {
    let bytes = encode_json(envios)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            EcoError::Io(format!(
                "Failed to create snapshot directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let tmp_path = temp_path(path);
    if let Err(e) = write_and_sync(&tmp_path, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(EcoError::Io(format!(
            "Failed to write {}: {}",
            tmp_path.display(),
            e
        )));
    }

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(EcoError::Io(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(bytes.len())
}

async fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::decode_json;
    use crate::core::registry::ShardedRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/data/output/envios.json"));
        assert_eq!(tmp, PathBuf::from("/data/output/envios.json.tmp"));
    }

    #[tokio::test]
    async fn test_write_snapshot_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");

        write_snapshot(&path, &[Envio::new("S1", "Ana", "Calle 1", "enviado")])
            .await
            .unwrap();
        write_snapshot(&path, &[Envio::new("S2", "Bob", "Calle 2", "pendiente")])
            .await
            .unwrap();

        let loaded = decode_json(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(loaded, vec![Envio::new("S2", "Bob", "Calle 2", "pendiente")]);
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_write_snapshot_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/output/envios.json");

        write_snapshot(&path, &[]).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_write_snapshot_failure_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");
        std::fs::write(&path, b"[]").unwrap();

        // A directory squatting on the temp name makes the write fail
        std::fs::create_dir(temp_path(&path)).unwrap();

        let result = write_snapshot(&path, &[Envio::new("S1", "", "", "")]).await;
        assert!(matches!(result, Err(EcoError::Io(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_trigger_and_flush_persist_latest_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("envios.json");
        let registry: Arc<dyn EnvioRegistry> = Arc::new(ShardedRegistry::new());
        let (writer, worker) = SnapshotWriter::spawn(Arc::clone(&registry), &path);

        for i in 0..50 {
            registry
                .upsert(Envio::new(format!("S{i}"), "c", "d", "e"))
                .unwrap();
            writer.trigger();
        }
        writer.flush().await;

        let loaded = decode_json(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(loaded.len(), 50);
        assert!(writer.last_error().is_none());

        writer.stop().await;
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_is_recorded_not_raised() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("envios.json");

        let registry: Arc<dyn EnvioRegistry> = Arc::new(ShardedRegistry::new());
        let (writer, worker) = SnapshotWriter::spawn(Arc::clone(&registry), &path);

        registry.upsert(Envio::new("S1", "", "", "")).unwrap();
        writer.trigger();
        writer.flush().await;

        assert!(writer.last_error().is_some());
        assert_eq!(registry.len(), 1);

        writer.stop().await;
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_trigger_after_stop_is_dropped() {
        let dir = TempDir::new().unwrap();
        let registry: Arc<dyn EnvioRegistry> = Arc::new(ShardedRegistry::new());
        let (writer, worker) = SnapshotWriter::spawn(registry, dir.path().join("envios.json"));

        writer.stop().await;
        worker.await.unwrap();

        writer.trigger();
        writer.flush().await;
        assert!(!dir.path().join("envios.json").exists());
    }

    #[tokio::test]
    async fn test_trigger_while_stop_pending_is_dropped() {
        let dir = TempDir::new().unwrap();
        let registry: Arc<dyn EnvioRegistry> = Arc::new(ShardedRegistry::new());
        let (writer, worker) =
            SnapshotWriter::spawn(Arc::clone(&registry), dir.path().join("envios.json"));

        writer.stop().await;
        assert!(writer.is_stopped());
        assert!(writer.clone().is_stopped());

        registry
            .upsert(Envio::new("S1", "Ana", "Calle 1", "enviado"))
            .unwrap();
        writer.trigger();

        worker.await.unwrap();
        writer.flush().await;
        assert!(!dir.path().join("envios.json").exists());
    }
}
