//! External system integrations for grafex.
//!
//! - [`grafana`] - Grafana HTTP API integration
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with fake implementations. The export core depends on
//! the [`grafana::RecordFetcher`] trait, never on reqwest directly.
//!
//! ```rust,no_run
//! use grafex::adapters::grafana::{GrafanaClient, RecordFetcher};
//! use grafex::config::{secret_string, GrafanaConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GrafanaConfig {
//!     base_url: "https://grafana.example.com".to_string(),
//!     api_key: Some(secret_string("glsa_token".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = GrafanaClient::new(config)?;
//! let folders = client.list_folders().await?;
//! # Ok(())
//! # }
//! ```

pub mod grafana;
