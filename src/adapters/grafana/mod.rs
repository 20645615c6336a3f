//! Grafana adapter implementation
//!
//! This module provides the integration with the Grafana HTTP API: the
//! [`RecordFetcher`] trait the export flows depend on, the reqwest client
//! that implements it, and the wire models.

pub mod client;
pub mod fetcher;
pub mod models;

pub use client::GrafanaClient;
pub use fetcher::RecordFetcher;
pub use models::{DashboardEnvelope, SearchHit};
