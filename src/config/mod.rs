//! Configuration management for EcoLogistics.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! EcoLogistics uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ECO_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`PathsConfig`] - Inbox, archive, output and snapshot locations
//! - [`IngestConfig`] - File pattern, polling interval, per-file output
//! - [`BootstrapConfig`] - Bounded wait for the startup snapshot
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [paths]
//! inbox_dir = "input"
//! archive_dir = "archived"
//! output_dir = "output"
//! snapshot_file = "envios.json"
//!
//! [ingest]
//! include_pattern = '.*\.csv'
//! poll_interval_ms = 500
//!
//! [bootstrap]
//! wait_ms = 1000
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ecologistics::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ecologistics.toml")?;
//! println!("Snapshot: {}", config.paths.snapshot_path().display());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, BootstrapConfig, EcoConfig, IngestConfig, LoggingConfig, PathsConfig,
};
