//! The four export flows
//!
//! Each flow makes one listing call, then handles items one at a time:
//! fetch (when the listing does not already carry the payload), place,
//! write. A failed listing aborts only that flow; a failed item is logged,
//! recorded and skipped.

use crate::adapters::grafana::RecordFetcher;
use crate::config::ExportConfig;
use crate::core::export::summary::{ExportError, ExportSummary, FlowSummary};
use crate::core::placement::{sanitize_segment, Placement, PlacementMapper};
use crate::core::tree::FolderTree;
use crate::core::writer::ExportWriter;
use crate::domain::{
    ContentItem, ExportFlow, ExportFormat, FetchError, FolderUid, GrafexError, ItemUid,
    ResourceKind,
};
use crate::{log_flow_complete, log_flow_start, log_item_skipped};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

/// File name of the alert rule aggregate, without extension
pub const ALERT_RULES_AGGREGATE: &str = "alert_rules";

/// Resource type of an alert rule group in the HCL export
pub const HCL_RULE_GROUP_RESOURCE: &str = "grafana_rule_group";

/// File name of the datasource aggregate
pub const DATASOURCES_AGGREGATE: &str = "datasources.json";

/// File name of the notification template aggregate, without extension
pub const NOTIFICATION_TEMPLATES_AGGREGATE: &str = "notification_templates";

/// Everything a flow needs besides its own state
pub struct FlowContext<'a> {
    pub fetcher: &'a dyn RecordFetcher,
    pub writer: ExportWriter,
    pub config: &'a ExportConfig,
    pub shutdown: &'a watch::Receiver<bool>,
}

impl FlowContext<'_> {
    pub fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Per-flow bookkeeping shared by the flow functions
struct FlowRun<'s> {
    flow: FlowSummary,
    summary: &'s mut ExportSummary,
    started: Instant,
}

impl<'s> FlowRun<'s> {
    fn start(flow: ExportFlow, root: &Path, summary: &'s mut ExportSummary) -> Self {
        log_flow_start!(flow, root);
        Self {
            flow: FlowSummary::new(flow),
            summary,
            started: Instant::now(),
        }
    }

    fn kind(&self) -> ExportFlow {
        self.flow.flow
    }

    /// A listing call failed; nothing else in this flow can run
    fn abort(mut self, what: &str, err: &GrafexError) -> FlowSummary {
        tracing::error!(flow = %self.kind(), error = %err, "Failed to {what}, skipping flow");
        self.summary.add_error(
            ExportError::from_error(self.kind(), err).with_context(what.to_string()),
        );
        self.flow.aborted = true;
        self.flow
    }

    /// One item could not be exported
    fn item_failed(&mut self, uid: &str, err: &GrafexError) {
        log_item_skipped!(self.kind(), uid, err);
        self.flow.items_failed += 1;
        self.summary
            .add_error(ExportError::from_error(self.kind(), err).with_context(format!("uid={uid}")));
    }

    /// Something went wrong that does not belong to a single item
    fn record(&mut self, context: &str, err: &GrafexError) {
        tracing::warn!(flow = %self.kind(), error = %err, context = %context, "Export error");
        self.summary
            .add_error(ExportError::from_error(self.kind(), err).with_context(context.to_string()));
    }

    /// Count a write; returns true if the file was written
    fn write_result(&mut self, uid: &str, result: crate::domain::Result<PathBuf>) -> bool {
        match result {
            Ok(path) => {
                self.flow.files_written += 1;
                tracing::debug!(flow = %self.kind(), uid = %uid, path = %path.display(), "Exported");
                true
            }
            Err(e) => {
                self.item_failed(uid, &e);
                false
            }
        }
    }

    /// Write one placed item and claim its path once the file exists
    fn write_placed(
        &mut self,
        mapper: &mut PlacementMapper<'_>,
        placement: &Placement,
        uid: &ItemUid,
        result: crate::domain::Result<PathBuf>,
    ) {
        if self.write_result(uid.as_str(), result) {
            mapper.claim(placement, uid);
        }
    }

    fn interrupted(&mut self) {
        tracing::warn!(flow = %self.kind(), "Shutdown requested, skipping remaining items");
        self.flow.interrupted = true;
    }

    fn finish(self) -> FlowSummary {
        log_flow_complete!(self.kind(), self.flow.files_written, self.started.elapsed());
        self.flow
    }
}

/// Export every dashboard into the mirrored folder tree
pub async fn export_dashboards(
    ctx: &FlowContext<'_>,
    tree: &FolderTree,
    summary: &mut ExportSummary,
) -> FlowSummary {
    let root = ctx.config.dashboards_root();
    let mut run = FlowRun::start(ExportFlow::Dashboards, &root, summary);

    let items = match ctx.fetcher.list_dashboards().await {
        Ok(items) => items,
        Err(e) => return run.abort("list dashboards", &e),
    };
    run.flow.items_total = items.len();

    if let Err(e) = ctx.writer.ensure_directory(&root) {
        return run.abort("create export root", &e);
    }

    if ctx.config.materialize_empty_folders {
        for uid in tree.folder_uids() {
            let dir = tree.directory_for(&root, Some(uid));
            match ctx.writer.ensure_directory(&dir) {
                Ok(()) => run.flow.directories_created += 1,
                Err(e) => run.record(&format!("folder={uid}"), &e),
            }
        }
    }

    let mut mapper = PlacementMapper::new(tree, root);
    for item in &items {
        if ctx.shutdown_requested() {
            run.interrupted();
            break;
        }

        let placement = mapper.place(item, ExportFormat::Json);
        if placement.degradation.is_some() {
            run.flow.degraded += 1;
        }

        let dashboard = match ctx.fetcher.fetch_dashboard(&item.uid).await {
            Ok(dashboard) => dashboard,
            Err(e) => {
                run.item_failed(item.uid.as_str(), &e);
                continue;
            }
        };

        let result = ctx
            .writer
            .write_json(&placement.directory, &placement.file_name, &dashboard);
        run.write_placed(&mut mapper, &placement, &item.uid, result);
    }

    run.flow.collisions = mapper.collisions();
    run.finish()
}

/// Export alert rules in every configured format
///
/// Each format is written as one aggregate document and also split into
/// one file per rule group, placed in the group's folder.
pub async fn export_alert_rules(
    ctx: &FlowContext<'_>,
    tree: &FolderTree,
    summary: &mut ExportSummary,
) -> FlowSummary {
    let formats = &ctx.config.alert_rule_formats;
    let first_root = formats
        .first()
        .map(|f| ctx.config.alert_rules_root(*f))
        .unwrap_or_else(|| PathBuf::from(&ctx.config.output_dir));
    let mut run = FlowRun::start(ExportFlow::AlertRules, &first_root, summary);

    let mut failed_exports = 0;
    for &format in formats {
        if ctx.shutdown_requested() {
            run.interrupted();
            break;
        }

        let root = ctx.config.alert_rules_root(format);
        let text = match ctx.fetcher.export_alert_rules(format).await {
            Ok(text) => text,
            Err(e) => {
                run.record(&format!("export alert rules as {format}"), &e);
                failed_exports += 1;
                continue;
            }
        };

        let aggregate = format!("{ALERT_RULES_AGGREGATE}{}", format.extension());
        match format {
            ExportFormat::Hcl => {
                run.flow.items_total += 1;
                let result = ctx.writer.write_text(&root, &aggregate, &text);
                run.write_result(&aggregate, result);

                export_hcl_rule_groups(ctx, tree, &root, &text, &mut run);
            }
            ExportFormat::Json => {
                let document: Value = match serde_json::from_str(&text) {
                    Ok(value) => value,
                    Err(e) => {
                        let err = GrafexError::from(FetchError::InvalidResponse(format!(
                            "alert rule export is not valid JSON: {e}"
                        )));
                        run.record("parse alert rule export", &err);
                        failed_exports += 1;
                        continue;
                    }
                };

                let result = ctx.writer.write_json(&root, &aggregate, &document);
                run.write_result(&aggregate, result);

                export_rule_groups(ctx, tree, &root, &document, &mut run);
            }
        }
    }

    if !formats.is_empty() && failed_exports == formats.len() {
        run.flow.aborted = true;
    }

    run.finish()
}

/// Write each group of a JSON alert rule export to `<folder>/<group>.json`
fn export_rule_groups(
    ctx: &FlowContext<'_>,
    tree: &FolderTree,
    root: &Path,
    document: &Value,
    run: &mut FlowRun<'_>,
) {
    let groups = match document.get("groups").and_then(Value::as_array) {
        Some(groups) => groups,
        None => {
            tracing::warn!("Alert rule export has no 'groups' array, nothing to split");
            return;
        }
    };
    run.flow.items_total += groups.len();

    let mut mapper = PlacementMapper::new(tree, root);
    for (index, group) in groups.iter().enumerate() {
        if ctx.shutdown_requested() {
            run.interrupted();
            break;
        }

        let name = str_field(group, "name").unwrap_or_default();
        let folder = str_field(group, "folder").unwrap_or_default();
        let uid = item_uid(&format!("{folder}/{name}"), "group", index);
        let item = ContentItem::new(uid, name, ResourceKind::AlertRuleGroup);

        // Groups name their folder by title; a unique title maps back to
        // the full nested path.
        let (directory, degradation) = if folder.is_empty() {
            (root.to_path_buf(), None)
        } else if let Some(folder_uid) = tree.uid_for_title(folder) {
            let resolution = tree.resolve(Some(folder_uid));
            (
                crate::core::tree::join_segments(root, &resolution.segments),
                resolution.degradation,
            )
        } else {
            (root.join(sanitize_segment(folder)), None)
        };
        if degradation.is_some() {
            run.flow.degraded += 1;
        }

        let placement = mapper.place_in(directory, &item, ExportFormat::Json, degradation);
        let saved = json!({
            "apiVersion": 1,
            "groups": [group],
        });
        let result = ctx
            .writer
            .write_json(&placement.directory, &placement.file_name, &saved);
        run.write_placed(&mut mapper, &placement, &item.uid, result);
    }

    run.flow.collisions += mapper.collisions();
}

/// Write each `grafana_rule_group` resource of an HCL alert rule export to
/// `<folder>/<group>.hcl`
///
/// HCL groups reference their folder by uid, so they go through the folder
/// tree like dashboards do.
fn export_hcl_rule_groups(
    ctx: &FlowContext<'_>,
    tree: &FolderTree,
    root: &Path,
    text: &str,
    run: &mut FlowRun<'_>,
) {
    let body = match hcl::parse(text) {
        Ok(body) => body,
        Err(e) => {
            let err = GrafexError::from(FetchError::InvalidResponse(format!(
                "alert rule export is not valid HCL: {e}"
            )));
            run.record("parse alert rule export", &err);
            return;
        }
    };

    let groups: Vec<&hcl::Block> = body
        .blocks()
        .filter(|block| {
            block.identifier.as_str() == "resource"
                && block.labels.first().map(|l| l.as_str()) == Some(HCL_RULE_GROUP_RESOURCE)
        })
        .collect();
    run.flow.items_total += groups.len();

    let mut mapper = PlacementMapper::new(tree, root);
    for (index, group) in groups.into_iter().enumerate() {
        if ctx.shutdown_requested() {
            run.interrupted();
            break;
        }

        let label = group.labels.get(1).map(|l| l.as_str()).unwrap_or_default();
        let name = hcl_str_attr(&group.body, "name").unwrap_or(label);
        let folder_uid =
            FolderUid::from_reference(hcl_str_attr(&group.body, "folder_uid").map(str::to_string));
        let item = ContentItem::new(
            item_uid(label, "group", index),
            name,
            ResourceKind::AlertRuleGroup,
        )
        .in_folder(folder_uid);

        let placement = mapper.place(&item, ExportFormat::Hcl);
        if placement.degradation.is_some() {
            run.flow.degraded += 1;
        }

        let document = hcl::Body::builder().add_block(group.clone()).build();
        let result = hcl::to_string(&document)
            .map_err(|e| {
                GrafexError::Serialization(format!(
                    "Failed to render rule group {} as HCL: {e}",
                    item.uid
                ))
            })
            .and_then(|rendered| {
                ctx.writer
                    .write_text(&placement.directory, &placement.file_name, &rendered)
            });
        run.write_placed(&mut mapper, &placement, &item.uid, result);
    }

    run.flow.collisions += mapper.collisions();
}

/// String attribute of an HCL block body
fn hcl_str_attr<'b>(body: &'b hcl::Body, key: &str) -> Option<&'b str> {
    body.attributes()
        .find(|attr| attr.key.as_str() == key)
        .and_then(|attr| match &attr.expr {
            hcl::Expression::String(value) => Some(value.as_str()),
            _ => None,
        })
        .filter(|value| !value.is_empty())
}

/// Export all datasources as one aggregate plus one file per datasource
pub async fn export_datasources(ctx: &FlowContext<'_>, summary: &mut ExportSummary) -> FlowSummary {
    let root = ctx.config.datasources_root();
    let mut run = FlowRun::start(ExportFlow::Datasources, &root, summary);

    let listing = match ctx.fetcher.list_datasources().await {
        Ok(listing) => listing,
        Err(e) => return run.abort("list datasources", &e),
    };
    let Some(datasources) = listing.as_array() else {
        let err = GrafexError::from(FetchError::InvalidResponse(
            "datasource listing is not a JSON array".to_string(),
        ));
        return run.abort("list datasources", &err);
    };
    run.flow.items_total = datasources.len();

    let result = ctx.writer.write_json(&root, DATASOURCES_AGGREGATE, &listing);
    run.write_result(DATASOURCES_AGGREGATE, result);

    let empty = FolderTree::default();
    let mut mapper = PlacementMapper::new(&empty, root);
    for (index, datasource) in datasources.iter().enumerate() {
        if ctx.shutdown_requested() {
            run.interrupted();
            break;
        }

        let uid = match (str_field(datasource, "uid"), datasource.get("id").and_then(Value::as_i64)) {
            (Some(uid), _) => item_uid(uid, "datasource", index),
            (None, Some(id)) => item_uid(&id.to_string(), "datasource", index),
            (None, None) => item_uid("", "datasource", index),
        };
        let name = str_field(datasource, "name").unwrap_or_default();
        let item = ContentItem::new(uid, name, ResourceKind::Datasource);

        let placement = mapper.place(&item, ExportFormat::Json);
        let result = ctx
            .writer
            .write_json(&placement.directory, &placement.file_name, datasource);
        run.write_placed(&mut mapper, &placement, &item.uid, result);
    }

    run.flow.collisions = mapper.collisions();
    run.finish()
}

/// Export notification templates in the configured format
///
/// The JSON format is also split into one file per template.
pub async fn export_notification_templates(
    ctx: &FlowContext<'_>,
    summary: &mut ExportSummary,
) -> FlowSummary {
    let format = ctx.config.notification_template_format;
    let root = ctx.config.notification_templates_root();
    let mut run = FlowRun::start(ExportFlow::NotificationTemplates, &root, summary);

    let text = match ctx.fetcher.export_notification_templates(format).await {
        Ok(text) => text,
        Err(e) => return run.abort("export notification templates", &e),
    };
    let aggregate = format!("{NOTIFICATION_TEMPLATES_AGGREGATE}{}", format.extension());

    match format {
        ExportFormat::Hcl => {
            run.flow.items_total = 1;
            let result = ctx.writer.write_text(&root, &aggregate, &text);
            run.write_result(&aggregate, result);
        }
        ExportFormat::Json => {
            let document: Value = match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    let err = GrafexError::from(FetchError::InvalidResponse(format!(
                        "notification template export is not valid JSON: {e}"
                    )));
                    return run.abort("parse notification templates", &err);
                }
            };

            let result = ctx.writer.write_json(&root, &aggregate, &document);
            run.write_result(&aggregate, result);

            let templates = document.as_array().map(Vec::as_slice).unwrap_or_default();
            run.flow.items_total = templates.len();

            let empty = FolderTree::default();
            let mut mapper = PlacementMapper::new(&empty, root);
            for (index, template) in templates.iter().enumerate() {
                if ctx.shutdown_requested() {
                    run.interrupted();
                    break;
                }

                let name = str_field(template, "name").unwrap_or_default();
                let item = ContentItem::new(
                    item_uid(name, "template", index),
                    name,
                    ResourceKind::NotificationTemplate,
                );
                let placement = mapper.place(&item, ExportFormat::Json);
                let result = ctx
                    .writer
                    .write_json(&placement.directory, &placement.file_name, template);
                run.write_placed(&mut mapper, &placement, &item.uid, result);
            }
            run.flow.collisions = mapper.collisions();
        }
    }

    run.finish()
}

/// Record an aborted flow whose prerequisite failed before it started
pub fn aborted_flow(
    flow: ExportFlow,
    what: &str,
    err: &ExportError,
    summary: &mut ExportSummary,
) -> FlowSummary {
    tracing::error!(flow = %flow, error = %err.message, "Failed to {what}, skipping flow");
    summary.add_error(ExportError {
        error_type: err.error_type,
        flow: Some(flow),
        message: err.message.clone(),
        context: Some(what.to_string()),
    });
    let mut summary = FlowSummary::new(flow);
    summary.aborted = true;
    summary
}

/// Non-empty string member of a JSON object
fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Item identifier from a listing field, or a positional one
fn item_uid(raw: &str, prefix: &str, index: usize) -> ItemUid {
    ItemUid::new(raw).unwrap_or_else(|_| ItemUid::positional(prefix, index))
}
