//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the grafex configuration file.

use crate::adapters::grafana::GrafanaClient;
use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_SUCCESS};
use crate::config::load_config_or_env;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also check that the Grafana server answers
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config_or_env validates as part of loading
        let config = match load_config_or_env(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let export = &config.export;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Grafana Server: {}", config.grafana.base_url);
        println!("  Auth Type: {}", config.grafana.auth_type);
        println!("  Timeout: {}s", config.grafana.timeout_seconds);
        println!(
            "  Flows: {}",
            export
                .flows
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Output Directory: {}", export.output_dir);
        println!("  Dashboards Root: {}", export.dashboards_root().display());
        for format in &export.alert_rule_formats {
            println!(
                "  Alert Rules Root ({format}): {}",
                export.alert_rules_root(*format).display()
            );
        }
        println!("  Datasources Root: {}", export.datasources_root().display());
        println!(
            "  Notification Templates Root: {} ({})",
            export.notification_templates_root().display(),
            export.notification_template_format
        );
        println!("  Dry Run: {}", export.dry_run);
        println!();

        if !self.check_connection {
            return Ok(EXIT_SUCCESS);
        }

        let client = match GrafanaClient::new(config.grafana.clone()) {
            Ok(client) => client,
            Err(e) => {
                println!("❌ Failed to create Grafana client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match client.health_check().await {
            Ok(()) => {
                println!("✅ Grafana server is reachable");
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Grafana server is not reachable");
                println!("   Error: {e}");
                Ok(EXIT_CONNECTION)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs::default();
        assert!(!args.check_connection);
    }
}
