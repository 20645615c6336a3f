//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for grafex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code: all flows succeeded
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code: some items or flows failed
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code: configuration missing or invalid
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: server unreachable or credentials rejected
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code: unexpected failure
pub const EXIT_FATAL: i32 = 5;
/// Exit code: interrupted by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// grafex - Grafana configuration backup tool
#[derive(Parser, Debug)]
#[command(name = "grafex")]
#[command(version, about, long_about = None)]
#[command(author = "Grafex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "grafex.toml", env = "GRAFEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GRAFEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export dashboards, alert rules, datasources and templates to disk
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExportFlow;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["grafex", "export"]);
        assert_eq!(cli.config, "grafex.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["grafex", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["grafex", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_flows() {
        let cli = Cli::parse_from([
            "grafex",
            "export",
            "--flow",
            "dashboards",
            "--flow",
            "alert-rules",
            "--dry-run",
            "--output-dir",
            "/backups",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.flows, vec![ExportFlow::Dashboards, ExportFlow::AlertRules]);
        assert!(args.dry_run);
        assert_eq!(args.output_dir.as_deref(), Some("/backups"));
    }

    #[test]
    fn test_cli_rejects_unknown_flow() {
        let result = Cli::try_parse_from(["grafex", "export", "--flow", "users"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["grafex", "validate-config", "--check-connection"]);
        let Commands::ValidateConfig(args) = cli.command else {
            panic!("expected validate-config command");
        };
        assert!(args.check_connection);
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["grafex", "init", "--force"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected init command");
        };
        assert_eq!(args.output, "grafex.toml");
        assert!(args.force);
    }
}
