//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the EcoLogistics configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as its last step
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Inbox: {}", config.paths.inbox_dir);
        println!("  Archive: {}", config.paths.archive_dir);
        println!("  Output: {}", config.paths.output_dir);
        println!("  Snapshot: {}", config.paths.snapshot_path().display());
        println!("  Include Pattern: {}", config.ingest.include_pattern);
        println!("  Poll Interval: {}ms", config.ingest.poll_interval_ms);
        println!("  Per-file Output: {}", config.ingest.write_file_output);
        println!("  Bootstrap Wait: {}ms", config.bootstrap.wait_ms);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!(
                    "{} ({})",
                    config.logging.local_path, config.logging.local_rotation
                )
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}
