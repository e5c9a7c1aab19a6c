//! Inbox watcher - polls the inbox directory and feeds the pipeline
//!
//! A file is claimed by renaming it into the archive directory under a
//! timestamped name before it is read, so it can never be picked up twice
//! from the inbox. The archived copy is kept for audit only.

use crate::config::EcoConfig;
use crate::core::ingest::pipeline::IngestionPipeline;
use crate::domain::{EcoError, Result};
use crate::log_error_with_context;
use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Timestamp format used when the configured one cannot be rendered
pub const DEFAULT_ARCHIVE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Polls an inbox directory for CSV files
pub struct InboxWatcher {
    pipeline: Arc<IngestionPipeline>,
    inbox_dir: PathBuf,
    archive_dir: PathBuf,
    include: Regex,
    poll_interval: Duration,
    timestamp_format: String,
}

impl InboxWatcher {
    /// Create a watcher from configuration
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::Configuration`] if the include pattern is invalid.
    pub fn new(pipeline: Arc<IngestionPipeline>, config: &EcoConfig) -> Result<Self> {
        let include = config
            .ingest
            .include_regex()
            .map_err(EcoError::Configuration)?;

        Ok(Self {
            pipeline,
            inbox_dir: PathBuf::from(&config.paths.inbox_dir),
            archive_dir: PathBuf::from(&config.paths.archive_dir),
            include,
            poll_interval: config.ingest.poll_interval(),
            timestamp_format: config.ingest.archive_timestamp_format.clone(),
        })
    }

    /// Poll until the shutdown signal flips to `true`
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::Io`] if the inbox or archive directory cannot be
    /// created. Failures on individual files are logged and never end the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.ensure_dirs().await?;

        tracing::info!(
            inbox = %self.inbox_dir.display(),
            archive = %self.archive_dir.display(),
            interval_ms = self.poll_interval.as_millis() as u64,
            "Watching inbox"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        log_error_with_context!(&e, "Inbox poll failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Inbox watcher stopping");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Claim and ingest every matching file currently in the inbox
    ///
    /// Files are processed one at a time in name order. Returns the number of
    /// files that were ingested.
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::Io`] only if the inbox cannot be listed.
    pub async fn poll_once(&self) -> Result<usize> {
        let mut names = self.list_inbox().await?;
        names.sort();

        let mut ingested = 0;
        for name in names {
            let archived = match self.claim(&name).await {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Could not claim file, skipping");
                    continue;
                }
            };

            tracing::info!(file = %name, archived = %archived.display(), "Processing CSV");

            match self.pipeline.ingest_file(&archived, &name).await {
                Ok(_) => ingested += 1,
                Err(e) if e.is_isolated() => {
                    tracing::warn!(
                        file = %name,
                        archived = %archived.display(),
                        error = %e,
                        "File rejected, registry untouched"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        file = %name,
                        archived = %archived.display(),
                        error = %e,
                        "Ingestion failed"
                    );
                }
            }
        }

        Ok(ingested)
    }

    async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.inbox_dir, &self.archive_dir] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                EcoError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    async fn list_inbox(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.inbox_dir).await.map_err(|e| {
            EcoError::Io(format!(
                "Failed to list inbox {}: {}",
                self.inbox_dir.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.include.is_match(name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    /// Move `name` from the inbox into the archive, returning the new path
    async fn claim(&self, name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.archive_dir).await?;

        let base = archive_name(name, Local::now(), &self.timestamp_format);
        let mut target = self.archive_dir.join(&base);
        let mut attempt = 1;
        while tokio::fs::try_exists(&target).await? {
            target = self.archive_dir.join(with_suffix(&base, attempt));
            attempt += 1;
        }

        move_file(&self.inbox_dir.join(name), &target).await?;
        Ok(target)
    }

    /// Inbox directory being watched
    pub fn inbox_dir(&self) -> &Path {
        &self.inbox_dir
    }
}

/// Rename `from` to `to`, copying across file systems when rename cannot
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(e),
        Err(e) => {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                error = %e,
                "Rename failed, falling back to copy"
            );
            copy_then_remove(from, to).await
        }
    }
}

/// Copy `from` to `to`, then remove `from`
///
/// If the source cannot be removed the copy is deleted again, so the file is
/// never claimed twice.
async fn copy_then_remove(from: &Path, to: &Path) -> std::io::Result<()> {
    tokio::fs::copy(from, to).await?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        let _ = tokio::fs::remove_file(to).await;
        return Err(e);
    }
    Ok(())
}

/// Archived name for `name`: `<stem>-<timestamp>.<ext>`
///
/// A format chrono cannot render falls back to [`DEFAULT_ARCHIVE_FORMAT`].
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use ecologistics::core::ingest::archive_name;
///
/// let at = Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
/// assert_eq!(
///     archive_name("envios.csv", at, "%Y%m%d%H%M%S"),
///     "envios-20240517093000.csv"
/// );
/// ```
pub fn archive_name(name: &str, at: DateTime<Local>, format: &str) -> String {
    let mut stamp = String::new();
    if write!(stamp, "{}", at.format(format)).is_err() {
        tracing::warn!(format, "Unrenderable archive timestamp format, using default");
        stamp.clear();
        let _ = write!(stamp, "{}", at.format(DEFAULT_ARCHIVE_FORMAT));
    }
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}-{}.{}",
            stem.to_string_lossy(),
            stamp,
            ext.to_string_lossy()
        ),
        _ => format!("{name}-{stamp}"),
    }
}

fn with_suffix(name: &str, n: u32) -> String {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}-{}.{}",
            stem.to_string_lossy(),
            n,
            ext.to_string_lossy()
        ),
        _ => format!("{name}-{n}"),
    }
}
