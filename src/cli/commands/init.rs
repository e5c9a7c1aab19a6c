//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ecologistics.toml")]
    pub output: String,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing EcoLogistics configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your directories", self.output);
                println!("  2. Validate configuration: ecologistics validate-config");
                println!("  3. Start the service: ecologistics watch");
                println!("  4. Drop CSV files into the inbox directory");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# EcoLogistics Configuration File

[application]
log_level = "info"

[paths]
inbox_dir = "input"
archive_dir = "archived"
output_dir = "output"
snapshot_file = "envios.json"

[ingest]
include_pattern = '.*\.csv'
poll_interval_ms = 500
write_file_output = true
archive_timestamp_format = "%Y%m%d%H%M%S"

[bootstrap]
wait_ms = 1000

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with explanatory comments
    fn generate_config_with_examples() -> String {
        r#"# EcoLogistics Configuration File
#
# Values may reference environment variables with ${VAR}. Any setting can
# also be overridden with ECO_<SECTION>_<KEY>, e.g. ECO_PATHS_INBOX_DIR.

[application]
# trace | debug | info | warn | error (RUST_LOG takes precedence)
log_level = "info"

[paths]
# Directory polled for incoming CSV files
inbox_dir = "input"

# Processed files are moved here as <stem>-<timestamp>.<ext>
archive_dir = "archived"

# Per-file JSON output and the default snapshot location
output_dir = "output"

# Snapshot of the whole registry, relative to output_dir unless absolute
snapshot_file = "envios.json"

[ingest]
# Regex matched against the whole file name
include_pattern = '.*\.csv'

# How often the inbox is polled
poll_interval_ms = 500

# Write <output_dir>/<stem>.json for every ingested file
write_file_output = true

# chrono format used in archived file names
archive_timestamp_format = "%Y%m%d%H%M%S"

[bootstrap]
# How long to wait for the snapshot file to appear at startup.
# A missing snapshot after this wait means an empty registry.
wait_ms = 1000

[logging]
# JSON log files with rotation, in addition to console output
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_are_loadable() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = load_config_from_str(&content).unwrap();
            assert_eq!(config.paths.snapshot_file, "envios.json");
            assert!(config.ingest.include_regex().unwrap().is_match("envios.csv"));
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("ecologistics.toml");
        std::fs::write(&output, "# mine").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# mine");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[paths]"));
    }
}
