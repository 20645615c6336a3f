//! Grafana HTTP client
//!
//! reqwest-backed implementation of [`RecordFetcher`]. One GET per call,
//! no retries: a failed request surfaces as a [`FetchError`] and the
//! caller decides how much of the run it costs.

use super::models::{DashboardEnvelope, SearchHit, HIT_TYPE_DASHBOARD, HIT_TYPE_FOLDER};
use super::RecordFetcher;
use crate::config::GrafanaConfig;
use crate::domain::ids::ItemUid;
use crate::domain::{
    ContentItem, ExportFormat, FetchError, FolderRecord, GrafexError, Result,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Page size for `/api/search`; Grafana caps `limit` at 5000
const SEARCH_PAGE_LIMIT: usize = 5000;

/// Upper bound on search pages, so a server that ignores `page` cannot
/// keep the loop alive forever
const MAX_SEARCH_PAGES: u32 = 100;

/// Grafana API client
///
/// # Example
///
/// ```no_run
/// use grafex::adapters::grafana::GrafanaClient;
/// use grafex::config::GrafanaConfig;
///
/// # async fn example() -> grafex::domain::Result<()> {
/// let client = GrafanaClient::new(GrafanaConfig::default())?;
/// client.health_check().await?;
/// # Ok(())
/// # }
/// ```
pub struct GrafanaClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Connection configuration
    config: GrafanaConfig,
}

impl GrafanaClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: GrafanaConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            GrafexError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Build authorization header value
    fn auth_header_value(&self) -> Option<String> {
        match self.config.auth_type.as_str() {
            "basic" => {
                let (Some(username), Some(password)) =
                    (&self.config.username, &self.config.password)
                else {
                    return None;
                };
                let credentials = format!("{username}:{}", password.expose_secret());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            _ => self
                .config
                .api_key
                .as_ref()
                .map(|key| format!("Bearer {}", key.expose_secret())),
        }
    }

    /// Issue a GET and turn transport failures and non-2xx statuses into
    /// fetch errors
    async fn send_get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, query = ?query, "GET");

        let mut request = self.client.get(&url).query(query);
        if let Some(auth) = self.auth_header_value() {
            request = request.header("Authorization", auth);
        }

        let resp = request.send().await.map_err(map_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::from_status(
                status.as_u16(),
                format!("GET {path} failed: {body}"),
            )
            .into());
        }

        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let resp = self.send_get(path, query).await?;
        resp.json::<T>().await.map_err(|e| {
            FetchError::InvalidResponse(format!("GET {path} returned undecodable JSON: {e}")).into()
        })
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let resp = self.send_get(path, query).await?;
        resp.text().await.map_err(|e| {
            FetchError::InvalidResponse(format!("GET {path} body could not be read: {e}")).into()
        })
    }

    /// Run a paginated search restricted to one hit type
    async fn search(&self, hit_type: &str) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch: Vec<SearchHit> = self
                .get_json(
                    "/api/search",
                    &[
                        ("type", hit_type.to_string()),
                        ("limit", SEARCH_PAGE_LIMIT.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let batch_len = batch.len();
            hits.extend(batch.into_iter().filter(|h| h.hit_type == hit_type));

            if batch_len < SEARCH_PAGE_LIMIT || page >= MAX_SEARCH_PAGES {
                break;
            }
            page += 1;
        }

        tracing::debug!(hit_type = %hit_type, count = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Check that the server is reachable
    ///
    /// Calls `/api/health`, which does not require authentication, so a
    /// passing check says nothing about the credentials.
    pub async fn health_check(&self) -> Result<()> {
        match self.send_get("/api/health", &[]).await {
            Ok(_) => {
                tracing::info!(base_url = %self.base_url, "Grafana health check passed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(base_url = %self.base_url, error = %e, "Grafana health check failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RecordFetcher for GrafanaClient {
    async fn list_folders(&self) -> Result<Vec<FolderRecord>> {
        let hits = self.search(HIT_TYPE_FOLDER).await?;
        let total = hits.len();
        let folders: Vec<FolderRecord> = hits.into_iter().filter_map(SearchHit::into_folder).collect();

        if folders.len() < total {
            tracing::warn!(
                skipped = total - folders.len(),
                "Skipping folder search hits without a uid"
            );
        }

        tracing::info!(count = folders.len(), "Fetched folders");
        Ok(folders)
    }

    async fn list_dashboards(&self) -> Result<Vec<ContentItem>> {
        let hits = self.search(HIT_TYPE_DASHBOARD).await?;
        let total = hits.len();
        let dashboards: Vec<ContentItem> = hits
            .into_iter()
            .filter_map(SearchHit::into_dashboard)
            .collect();

        if dashboards.len() < total {
            tracing::warn!(
                skipped = total - dashboards.len(),
                "Skipping dashboard search hits without a uid"
            );
        }

        tracing::info!(count = dashboards.len(), "Fetched dashboard listing");
        Ok(dashboards)
    }

    async fn fetch_dashboard(&self, uid: &ItemUid) -> Result<serde_json::Value> {
        let path = format!("/api/dashboards/uid/{uid}");
        let envelope: DashboardEnvelope = self.get_json(&path, &[]).await?;
        Ok(envelope.into_dashboard(uid)?)
    }

    async fn export_alert_rules(&self, format: ExportFormat) -> Result<String> {
        self.get_text(
            "/api/v1/provisioning/alert-rules/export",
            &[("format", format.as_str().to_string())],
        )
        .await
    }

    async fn list_datasources(&self) -> Result<serde_json::Value> {
        self.get_json("/api/datasources", &[]).await
    }

    async fn export_notification_templates(&self, format: ExportFormat) -> Result<String> {
        self.get_text(
            "/api/v1/provisioning/templates",
            &[("format", format.as_str().to_string())],
        )
        .await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_transport_error(e: reqwest::Error) -> GrafexError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string()).into()
    } else {
        FetchError::ConnectionFailed(e.to_string()).into()
    }
}
