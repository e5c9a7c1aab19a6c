//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for EcoLogistics using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// EcoLogistics - shipment ingestion service
#[derive(Parser, Debug)]
#[command(name = "ecologistics")]
#[command(version, about, long_about = None)]
#[command(author = "EcoLogistics Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ecologistics.toml", env = "ECO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ECO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the inbox directory and ingest CSV files until interrupted
    Watch(commands::watch::WatchArgs),

    /// Ingest a single CSV file and persist the snapshot
    Ingest(commands::ingest::IngestArgs),

    /// Show the shipments held in the persisted snapshot
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_watch() {
        let cli = Cli::parse_from(["ecologistics", "watch"]);
        assert_eq!(cli.config, "ecologistics.toml");
        assert!(matches!(cli.command, Commands::Watch(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ecologistics", "--config", "custom.toml", "watch"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ecologistics", "--log-level", "debug", "watch"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["ecologistics", "ingest", "input/envios.csv"]);
        match cli.command {
            Commands::Ingest(args) => assert_eq!(args.file, "input/envios.csv"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_ingest_requires_file() {
        assert!(Cli::try_parse_from(["ecologistics", "ingest"]).is_err());
    }

    #[test]
    fn test_cli_parse_status_with_id() {
        let cli = Cli::parse_from(["ecologistics", "status", "--id", "S1"]);
        match cli.command {
            Commands::Status(args) => assert_eq!(args.id.as_deref(), Some("S1")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["ecologistics", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ecologistics", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
