//! Configuration schema types
//!
//! This module defines the configuration structure for EcoLogistics.

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main EcoLogistics configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcoConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Inbox, archive and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Startup snapshot loading
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EcoConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.paths.validate()?;
        self.ingest.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// File system locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory polled for incoming CSV files
    #[serde(default = "default_inbox_dir")]
    pub inbox_dir: String,

    /// Directory receiving timestamped copies of processed files
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Directory for the snapshot and per-file JSON output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Snapshot file name, relative to `output_dir` unless absolute
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

impl PathsConfig {
    /// Resolved location of the durable snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.snapshot_file);
        if file.is_absolute() {
            file
        } else {
            PathBuf::from(&self.output_dir).join(file)
        }
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("paths.inbox_dir", &self.inbox_dir),
            ("paths.archive_dir", &self.archive_dir),
            ("paths.output_dir", &self.output_dir),
            ("paths.snapshot_file", &self.snapshot_file),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }

        if self.inbox_dir == self.archive_dir {
            return Err(
                "paths.archive_dir must differ from paths.inbox_dir, otherwise archived files are picked up again"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            inbox_dir: default_inbox_dir(),
            archive_dir: default_archive_dir(),
            output_dir: default_output_dir(),
            snapshot_file: default_snapshot_file(),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Regular expression a file name must fully match to be ingested
    #[serde(default = "default_include_pattern")]
    pub include_pattern: String,

    /// Inbox polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Also write `<output_dir>/<stem>.json` for every ingested file
    #[serde(default = "default_true")]
    pub write_file_output: bool,

    /// chrono format used for the archived file name suffix
    #[serde(default = "default_archive_timestamp_format")]
    pub archive_timestamp_format: String,
}

impl IngestConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Compiles `include_pattern`, anchored on both ends
    pub fn include_regex(&self) -> Result<Regex, String> {
        Regex::new(&format!("^(?:{})$", self.include_pattern))
            .map_err(|e| format!("Invalid ingest.include_pattern: {e}"))
    }

    fn validate(&self) -> Result<(), String> {
        self.include_regex()?;

        if self.poll_interval_ms == 0 {
            return Err("ingest.poll_interval_ms must be greater than 0".to_string());
        }

        self.validate_timestamp_format()
    }

    fn validate_timestamp_format(&self) -> Result<(), String> {
        let format = &self.archive_timestamp_format;
        if format.trim().is_empty() {
            return Err("ingest.archive_timestamp_format cannot be empty".to_string());
        }

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(format!(
                "Invalid ingest.archive_timestamp_format '{format}': unknown specifier"
            ));
        }

        // The stamp becomes part of a file name
        let sample = Local
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .map(|at| at.format(format).to_string())
            .unwrap_or_default();
        if sample.contains('/') || sample.contains('\\') {
            return Err(format!(
                "Invalid ingest.archive_timestamp_format '{format}': produces a path separator"
            ));
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            include_pattern: default_include_pattern(),
            poll_interval_ms: default_poll_interval_ms(),
            write_file_output: true,
            archive_timestamp_format: default_archive_timestamp_format(),
        }
    }
}

/// Startup snapshot loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// How long to wait for the snapshot file to appear before starting empty
    #[serde(default = "default_bootstrap_wait_ms")]
    pub wait_ms: u64,
}

impl BootstrapConfig {
    /// Bounded wait as a Duration
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_bootstrap_wait_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_inbox_dir() -> String {
    "input".to_string()
}

fn default_archive_dir() -> String {
    "archived".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_snapshot_file() -> String {
    "envios.json".to_string()
}

fn default_include_pattern() -> String {
    r".*\.csv".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_archive_timestamp_format() -> String {
    "%Y%m%d%H%M%S".to_string()
}

fn default_bootstrap_wait_ms() -> u64 {
    1000
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        let config = EcoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.paths.inbox_dir, "input");
        assert_eq!(config.bootstrap.wait_ms, 1000);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: EcoConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.paths.snapshot_file, "envios.json");
        assert!(config.ingest.write_file_output);
    }

    #[test]
    fn test_snapshot_path_relative_to_output_dir() {
        let paths = PathsConfig::default();
        assert_eq!(paths.snapshot_path(), PathBuf::from("output/envios.json"));
    }

    #[test]
    fn test_snapshot_path_absolute() {
        let paths = PathsConfig {
            snapshot_file: "/var/lib/eco/envios.json".to_string(),
            ..PathsConfig::default()
        };
        assert_eq!(
            paths.snapshot_path(),
            PathBuf::from("/var/lib/eco/envios.json")
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = EcoConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inbox_equal_to_archive_rejected() {
        let mut config = EcoConfig::default();
        config.paths.archive_dir = config.paths.inbox_dir.clone();
        let err = config.validate().unwrap_err();
        assert!(err.contains("archive_dir"));
    }

    #[test]
    fn test_include_pattern_is_anchored() {
        let ingest = IngestConfig::default();
        let re = ingest.include_regex().unwrap();
        assert!(re.is_match("envios.csv"));
        assert!(!re.is_match("envios.csv.tmp"));
        assert!(!re.is_match("envios.json"));
    }

    #[test]
    fn test_invalid_include_pattern() {
        let mut config = EcoConfig::default();
        config.ingest.include_pattern = "(unclosed".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = EcoConfig::default();
        config.ingest.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test_case("%Q" ; "unknown specifier")]
    #[test_case("%Y%m%d%" ; "dangling percent")]
    #[test_case("%Y/%m/%d" ; "slash in output")]
    #[test_case("%D" ; "slash from specifier")]
    #[test_case("  " ; "blank")]
    fn test_invalid_archive_timestamp_format(format: &str) {
        let mut config = EcoConfig::default();
        config.ingest.archive_timestamp_format = format.to_string();
        assert!(config.validate().is_err());
    }

    #[test_case("%Y%m%d%H%M%S" ; "default")]
    #[test_case("%Y-%m-%dT%H%M%S" ; "iso like")]
    fn test_valid_archive_timestamp_format(format: &str) {
        let mut config = EcoConfig::default();
        config.ingest.archive_timestamp_format = format.to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = EcoConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
