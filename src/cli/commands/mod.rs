//! CLI command implementations
//!
//! Commands return a process exit code: 0 on success, 1 when some rows were
//! skipped, 2 for configuration errors, 3 when the snapshot cannot be
//! bootstrapped and 5 for anything else fatal.

pub mod ingest;
pub mod init;
pub mod status;
pub mod validate;
pub mod watch;

use crate::config::{load_config, load_config_from_str, EcoConfig};
use crate::domain::Result;
use std::path::Path;

/// Load `config_path`, falling back to defaults plus `ECO_*` overrides when
/// the file does not exist
pub(crate) fn load_or_default(config_path: &str) -> Result<EcoConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::warn!(
            config_path = %config_path,
            "Configuration file not found, using defaults"
        );
        load_config_from_str("")
    }
}
