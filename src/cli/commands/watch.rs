//! Watch command implementation
//!
//! Runs the service: bootstrap the registry, then poll the inbox until a
//! shutdown signal arrives.

use super::load_or_default;
use crate::core::runtime::EnvioRuntime;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Override the inbox directory
    #[arg(long)]
    pub inbox_dir: Option<String>,

    /// Override the poll interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
}

impl WatchArgs {
    /// Execute the watch command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Loading configuration");

        let mut config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(ref dir) = self.inbox_dir {
            tracing::info!(inbox_dir = %dir, "Overriding inbox directory from CLI");
            config.paths.inbox_dir = dir.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            tracing::info!(poll_interval_ms = ms, "Overriding poll interval from CLI");
            config.ingest.poll_interval_ms = ms;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let runtime = match EnvioRuntime::start(&config).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Bootstrap failed, aborting startup");
                eprintln!("Failed to load snapshot: {e}");
                return Ok(3);
            }
        };

        let report = runtime.bootstrap_report();
        println!("📦 Registry ready: {} shipment(s)", report.loaded);
        if !report.skipped.is_empty() {
            println!(
                "⚠️  {} persisted record(s) skipped during bootstrap",
                report.skipped.len()
            );
        }

        let watcher = match runtime.inbox_watcher() {
            Ok(w) => w,
            Err(e) => {
                eprintln!("Invalid ingest configuration: {e}");
                runtime.shutdown().await;
                return Ok(2);
            }
        };

        println!("👀 Watching {} (Ctrl+C to stop)", watcher.inbox_dir().display());
        println!();

        let result = watcher.run(shutdown_signal).await;
        runtime.shutdown().await;

        match result {
            Ok(()) => {
                println!("✅ Stopped cleanly");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Inbox watcher failed");
                eprintln!("Inbox watcher failed: {e}");
                Ok(5)
            }
        }
    }
}
