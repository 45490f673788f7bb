//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Arca using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Arca - disaster-recovery replicator for a preservation archive
#[derive(Parser, Debug)]
#[command(name = "arca")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "arca.toml", env = "ARCA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ARCA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consume change notifications and replicate into the local OCFL mirror
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["arca", "run"]);
        assert_eq!(cli.config, "arca.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["arca", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["arca", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["arca", "run", "--once", "--dry-run"]);
        if let Commands::Run(args) = cli.command {
            assert!(args.once);
            assert!(args.dry_run);
        } else {
            panic!("Expected run command");
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["arca", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["arca", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
