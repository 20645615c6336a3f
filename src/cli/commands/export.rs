//! Export command implementation
//!
//! This module implements the `export` command, which mirrors the
//! configured Grafana objects onto disk.

use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::config::load_config_or_env;
use crate::core::export::{ExportCoordinator, ExportErrorType, ExportSummary};
use crate::domain::{ExportFlow, GrafexError};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Run only this flow (repeatable): dashboards, alert_rules,
    /// datasources, notification_templates
    #[arg(long = "flow", value_name = "FLOW")]
    pub flows: Vec<ExportFlow>,

    /// Dry run mode - resolve and log every path without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Override the directory the export roots are created in
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_or_env(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if !self.flows.is_empty() {
            tracing::info!(flows = ?self.flows, "Overriding flows from CLI");
            config.export.flows = self.flows.clone();
        }

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        if config.export.dry_run {
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        let coordinator = match ExportCoordinator::from_config(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(GrafexError::Configuration(e)) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        print_summary(&summary);

        let exit_code = exit_code_for(&summary);
        match exit_code {
            EXIT_INTERRUPTED => {
                println!("⚠️  Export interrupted. Files written so far are complete.");
                tracing::info!("Export interrupted by user signal");
            }
            EXIT_SUCCESS => println!("✅ Export completed successfully!"),
            EXIT_CONNECTION => println!("❌ Could not reach Grafana, nothing was exported"),
            _ => println!("⚠️  Export completed with failures"),
        }

        Ok(exit_code)
    }
}

/// Map a finished run to the process exit code
pub fn exit_code_for(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        return EXIT_INTERRUPTED;
    }
    if summary.is_successful() {
        return EXIT_SUCCESS;
    }

    let unreachable = summary.all_flows_aborted()
        && summary.errors.iter().all(|e| {
            matches!(
                e.error_type,
                ExportErrorType::Connection | ExportErrorType::Authentication
            )
        });
    if unreachable {
        EXIT_CONNECTION
    } else {
        EXIT_PARTIAL
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    for flow in &summary.flows {
        let status = if flow.aborted {
            "aborted"
        } else if flow.interrupted {
            "interrupted"
        } else {
            "done"
        };
        println!(
            "  {:<24} {:>5} items  {:>5} files  {:>3} failed  {:>3} degraded  ({status})",
            flow.flow.as_str(),
            flow.items_total,
            flow.files_written,
            flow.items_failed,
            flow.degraded,
        );
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            let flow = error.flow.map(|f| f.as_str()).unwrap_or("-");
            println!("  - [{flow}] {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}
