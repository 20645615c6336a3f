//! Export coordinator - main orchestrator for the export process
//!
//! Runs the selected flows in order against one fetcher, one writer and one
//! folder tree, and collects their results into an [`ExportSummary`].

use crate::adapters::grafana::{GrafanaClient, RecordFetcher};
use crate::config::GrafexConfig;
use crate::core::export::flows::{self, FlowContext};
use crate::core::export::summary::{ExportError, ExportSummary};
use crate::core::tree::FolderTree;
use crate::core::writer::ExportWriter;
use crate::domain::{ExportFlow, GrafexError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: GrafexConfig,
    fetcher: Arc<dyn RecordFetcher>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a coordinator around an existing fetcher
    pub fn new(
        config: GrafexConfig,
        fetcher: Arc<dyn RecordFetcher>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            fetcher,
            shutdown,
        }
    }

    /// Create a coordinator talking to the Grafana server from the config
    pub fn from_config(config: GrafexConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let client = GrafanaClient::new(config.grafana.clone())?;
        tracing::debug!(base_url = %client.base_url(), "Created Grafana client");
        Ok(Self::new(config, Arc::new(client), shutdown))
    }

    /// Selected flows in run order, duplicates removed
    fn selected_flows(&self) -> Vec<ExportFlow> {
        let mut selected = Vec::new();
        for flow in &self.config.export.flows {
            if !selected.contains(flow) {
                selected.push(*flow);
            }
        }
        selected
    }

    /// Execute the export
    ///
    /// Per-flow and per-item failures end up in the summary. Only an
    /// invalid configuration is returned as an error.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.config.export.dry_run;

        self.config
            .validate()
            .map_err(GrafexError::Configuration)?;

        let selected = self.selected_flows();
        tracing::info!(
            base_url = %self.fetcher.base_url(),
            flows = ?selected.iter().map(ExportFlow::as_str).collect::<Vec<_>>(),
            output_dir = %self.config.export.output_dir,
            dry_run = self.config.export.dry_run,
            "Starting export process"
        );

        if self.config.export.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
        }

        let needs_tree = selected
            .iter()
            .any(|f| matches!(f, ExportFlow::Dashboards | ExportFlow::AlertRules));
        let folder_tree = if needs_tree {
            Some(self.load_folder_tree().await)
        } else {
            None
        };

        let ctx = FlowContext {
            fetcher: self.fetcher.as_ref(),
            writer: ExportWriter::new(self.config.export.dry_run),
            config: &self.config.export,
            shutdown: &self.shutdown,
        };

        for flow in selected {
            if ctx.shutdown_requested() {
                tracing::warn!(flow = %flow, "Shutdown requested, skipping flow");
                summary.interrupted = true;
                break;
            }

            let result = match flow {
                ExportFlow::Dashboards => match &folder_tree {
                    Some(Ok(tree)) => flows::export_dashboards(&ctx, tree, &mut summary).await,
                    Some(Err(err)) => {
                        flows::aborted_flow(flow, "list folders", err, &mut summary)
                    }
                    None => flows::export_dashboards(&ctx, &FolderTree::default(), &mut summary).await,
                },
                ExportFlow::AlertRules => {
                    let empty = FolderTree::default();
                    let tree = match &folder_tree {
                        Some(Ok(tree)) => tree,
                        Some(Err(err)) => {
                            tracing::warn!(
                                error = %err.message,
                                "Folder listing unavailable, alert rule groups are placed by folder title only"
                            );
                            summary.add_error(
                                err.clone()
                                    .in_flow(flow)
                                    .with_context("list folders".to_string()),
                            );
                            &empty
                        }
                        None => &empty,
                    };
                    flows::export_alert_rules(&ctx, tree, &mut summary).await
                }
                ExportFlow::Datasources => flows::export_datasources(&ctx, &mut summary).await,
                ExportFlow::NotificationTemplates => {
                    flows::export_notification_templates(&ctx, &mut summary).await
                }
            };

            summary.add_flow(result);
        }

        let duration = start_time.elapsed();
        summary = summary.with_duration(duration);
        summary.log_summary();

        Ok(summary)
    }

    /// List folders once for every flow that needs the tree
    async fn load_folder_tree(&self) -> std::result::Result<FolderTree, ExportError> {
        match self.fetcher.list_folders().await {
            Ok(folders) => {
                let tree = FolderTree::build(folders);
                tracing::info!(
                    folders = tree.len(),
                    degraded = tree.degraded_count(),
                    "Resolved folder tree"
                );
                Ok(tree)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list folders");
                Err(ExportError::new((&e).into(), e.to_string()))
            }
        }
    }
}
