//! Shared fixtures for integration tests
//!
//! `FakeFetcher` is an in-memory `RecordFetcher`: listings and payloads are
//! plain fields, and any call can be made to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use grafex::adapters::grafana::RecordFetcher;
use grafex::config::{secret_string, ExportConfig, GrafanaConfig, GrafexConfig};
use grafex::domain::{
    ContentItem, ExportFlow, ExportFormat, FetchError, FolderRecord, FolderUid, ItemUid,
    ResourceKind, Result,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeFetcher {
    pub folders: Vec<FolderRecord>,
    pub dashboards: Vec<ContentItem>,
    pub dashboard_payloads: HashMap<String, Value>,
    pub alert_rules_json: Option<String>,
    pub alert_rules_hcl: Option<String>,
    pub datasources: Option<Value>,
    pub templates_json: Option<String>,
    pub templates_hcl: Option<String>,

    /// Dashboard uids whose detail fetch fails
    pub failing_dashboards: HashSet<String>,
    pub fail_folder_listing: bool,
    pub fail_dashboard_listing: bool,

    /// Dashboard uids fetched, in call order
    pub fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, uid: &str, title: &str, parent: Option<&str>) -> Self {
        let mut record = FolderRecord::new(FolderUid::new(uid).unwrap(), title);
        if let Some(parent) = parent {
            record = record.with_parent(FolderUid::new(parent).unwrap());
        }
        self.folders.push(record);
        self
    }

    pub fn with_dashboard(mut self, uid: &str, title: &str, folder: Option<&str>) -> Self {
        let item = ContentItem::new(ItemUid::new(uid).unwrap(), title, ResourceKind::Dashboard)
            .in_folder(folder.map(|f| FolderUid::new(f).unwrap()));
        self.dashboards.push(item);
        self.dashboard_payloads.insert(
            uid.to_string(),
            json!({"uid": uid, "title": title, "panels": [], "schemaVersion": 39}),
        );
        self
    }

    pub fn failing_dashboard(mut self, uid: &str) -> Self {
        self.failing_dashboards.insert(uid.to_string());
        self
    }

    pub fn fetched_dashboards(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

fn not_found(what: &str) -> grafex::domain::GrafexError {
    FetchError::NotFound(what.to_string()).into()
}

#[async_trait]
impl RecordFetcher for FakeFetcher {
    async fn list_folders(&self) -> Result<Vec<FolderRecord>> {
        if self.fail_folder_listing {
            return Err(FetchError::ConnectionFailed("connection refused".to_string()).into());
        }
        Ok(self.folders.clone())
    }

    async fn list_dashboards(&self) -> Result<Vec<ContentItem>> {
        if self.fail_dashboard_listing {
            return Err(FetchError::ConnectionFailed("connection refused".to_string()).into());
        }
        Ok(self.dashboards.clone())
    }

    async fn fetch_dashboard(&self, uid: &ItemUid) -> Result<Value> {
        self.fetched.lock().unwrap().push(uid.to_string());
        if self.failing_dashboards.contains(uid.as_str()) {
            return Err(FetchError::ServerError {
                status: 500,
                message: "internal error".to_string(),
            }
            .into());
        }
        self.dashboard_payloads
            .get(uid.as_str())
            .cloned()
            .ok_or_else(|| not_found(uid.as_str()))
    }

    async fn export_alert_rules(&self, format: ExportFormat) -> Result<String> {
        let body = match format {
            ExportFormat::Json => &self.alert_rules_json,
            ExportFormat::Hcl => &self.alert_rules_hcl,
        };
        body.clone().ok_or_else(|| not_found("alert rules"))
    }

    async fn list_datasources(&self) -> Result<Value> {
        self.datasources.clone().ok_or_else(|| not_found("datasources"))
    }

    async fn export_notification_templates(&self, format: ExportFormat) -> Result<String> {
        let body = match format {
            ExportFormat::Json => &self.templates_json,
            ExportFormat::Hcl => &self.templates_hcl,
        };
        body.clone().ok_or_else(|| not_found("templates"))
    }

    fn base_url(&self) -> &str {
        "http://fake-grafana"
    }
}

/// Valid configuration writing under `output_dir` and running `flows`
pub fn test_config(output_dir: &Path, flows: &[ExportFlow]) -> GrafexConfig {
    GrafexConfig {
        application: Default::default(),
        grafana: GrafanaConfig {
            api_key: Some(secret_string("glsa_test".to_string())),
            ..Default::default()
        },
        export: ExportConfig {
            output_dir: output_dir.to_string_lossy().to_string(),
            flows: flows.to_vec(),
            ..Default::default()
        },
        logging: Default::default(),
    }
}

/// Relative paths of every file under `root`, sorted
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
}
