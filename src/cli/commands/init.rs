//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "grafex.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing grafex configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Create a .env file with your credentials:");
                println!("     GRAFANA_API_URL=https://grafana.example.com");
                println!("     GRAFANA_API_KEY=<service account token>");
                println!("  2. Edit {} to pick flows and output roots", self.output);
                println!("  3. Validate configuration: grafex validate-config --check-connection");
                println!("  4. Run export: grafex export");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample configuration with every setting at its default
    pub fn generate_config() -> &'static str {
        r#"# grafex configuration file
# Mirrors Grafana dashboards, alert rules, datasources and notification
# templates into a directory tree.

[application]
log_level = "info"

[grafana]
base_url = "${GRAFANA_API_URL}"
auth_type = "bearer"  # bearer | basic
api_key = "${GRAFANA_API_KEY}"
# username = "admin"
# password = "${GRAFANA_PASSWORD}"
timeout_seconds = 30
tls_verify = true

[export]
output_dir = "."
flows = ["dashboards", "alert_rules", "datasources", "notification_templates"]
alert_rule_formats = ["json", "hcl"]
notification_template_format = "hcl"
materialize_empty_folders = true
dry_run = false

[export.roots]
dashboards = "grafana-dash-backup"
alert_rules_json = "grafana-alert-backup-json"
alert_rules_hcl = "grafana-alert-backup-hcl"
datasources = "grafana-datasource-backup"
notification_templates = "grafana-notification-template-backup"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
    }
}
