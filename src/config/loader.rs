//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EcoConfig;
use crate::domain::errors::EcoError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EcoConfig
/// 4. Applies environment variable overrides (ECO_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`EcoError::Configuration`] if the file cannot be read or parsed,
/// a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ecologistics::config::loader::load_config;
///
/// let config = load_config("ecologistics.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EcoConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EcoError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EcoError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text, applying the same steps as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<EcoConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: EcoConfig = toml::from_str(&contents)
        .map_err(|e| EcoError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        EcoError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EcoError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Comments are left untouched
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(EcoError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ECO_* prefix
///
/// Environment variables follow the pattern: ECO_<SECTION>_<KEY>,
/// for example ECO_PATHS_INBOX_DIR or ECO_BOOTSTRAP_WAIT_MS.
/// Unparseable numeric or boolean values are ignored.
fn apply_env_overrides(config: &mut EcoConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("ECO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Path overrides
    if let Ok(val) = std::env::var("ECO_PATHS_INBOX_DIR") {
        config.paths.inbox_dir = val;
    }
    if let Ok(val) = std::env::var("ECO_PATHS_ARCHIVE_DIR") {
        config.paths.archive_dir = val;
    }
    if let Ok(val) = std::env::var("ECO_PATHS_OUTPUT_DIR") {
        config.paths.output_dir = val;
    }
    if let Ok(val) = std::env::var("ECO_PATHS_SNAPSHOT_FILE") {
        config.paths.snapshot_file = val;
    }

    // Ingest overrides
    if let Ok(val) = std::env::var("ECO_INGEST_INCLUDE_PATTERN") {
        config.ingest.include_pattern = val;
    }
    if let Ok(val) = std::env::var("ECO_INGEST_POLL_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.ingest.poll_interval_ms = interval;
        }
    }
    if let Ok(val) = std::env::var("ECO_INGEST_WRITE_FILE_OUTPUT") {
        if let Ok(enabled) = val.parse() {
            config.ingest.write_file_output = enabled;
        }
    }

    // Bootstrap overrides
    if let Ok(val) = std::env::var("ECO_BOOTSTRAP_WAIT_MS") {
        if let Ok(wait) = val.parse() {
            config.bootstrap.wait_ms = wait;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ECO_LOGGING_LOCAL_ENABLED") {
        if let Ok(enabled) = val.parse() {
            config.logging.local_enabled = enabled;
        }
    }
    if let Ok(val) = std::env::var("ECO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
