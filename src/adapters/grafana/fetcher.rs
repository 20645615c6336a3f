//! Record fetcher trait definition
//!
//! This module defines the `RecordFetcher` trait that abstracts the platform
//! API. The export flows only ever talk to this trait, which keeps them
//! testable against an in-memory fake and keeps reqwest out of the core.

use crate::domain::ids::ItemUid;
use crate::domain::{ContentItem, ExportFormat, FolderRecord, Result};
use async_trait::async_trait;

/// Read-only access to the platform's configuration objects
///
/// Every method may fail with [`crate::domain::FetchError`] wrapped in
/// [`crate::domain::GrafexError::Fetch`]. Callers decide whether a failure
/// aborts a flow (listing calls) or only skips one item (detail calls).
///
/// # Example
///
/// ```no_run
/// use grafex::adapters::grafana::{GrafanaClient, RecordFetcher};
/// use grafex::config::GrafanaConfig;
///
/// # async fn example() -> grafex::domain::Result<()> {
/// let client = GrafanaClient::new(GrafanaConfig::default())?;
///
/// let folders = client.list_folders().await?;
/// let dashboards = client.list_dashboards().await?;
/// for dashboard in &dashboards {
///     let payload = client.fetch_dashboard(&dashboard.uid).await?;
///     println!("{} has {} top-level keys", dashboard.title, payload.as_object().map_or(0, |o| o.len()));
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// List every folder, nested folders included
    ///
    /// Each record carries its parent reference when the folder is nested.
    async fn list_folders(&self) -> Result<Vec<FolderRecord>>;

    /// List dashboard summaries with their containing folder reference
    async fn list_dashboards(&self) -> Result<Vec<ContentItem>>;

    /// Fetch the full dashboard model for one dashboard
    ///
    /// Returns only the `dashboard` member of the API response.
    async fn fetch_dashboard(&self, uid: &ItemUid) -> Result<serde_json::Value>;

    /// Fetch the provisioning export of all alert rules in the given format
    async fn export_alert_rules(&self, format: ExportFormat) -> Result<String>;

    /// List all datasources as the raw JSON array
    async fn list_datasources(&self) -> Result<serde_json::Value>;

    /// Fetch all notification templates in the given format
    async fn export_notification_templates(&self, format: ExportFormat) -> Result<String>;

    /// Base URL of the server, for logging
    fn base_url(&self) -> &str;
}
