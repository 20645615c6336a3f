//! Configuration management for grafex.
//!
//! grafex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GRAFEX_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation before any request is made
//!
//! When no configuration file exists the tool falls back to
//! `GRAFANA_API_URL` and `GRAFANA_API_KEY`, which may come from a `.env`
//! file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grafex::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("grafex.toml")?;
//!
//! println!("Grafana: {}", config.grafana.base_url);
//! println!("Dashboards go to {}", config.export.dashboards_root().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [grafana]
//! base_url = "${GRAFANA_API_URL}"
//! api_key = "${GRAFANA_API_KEY}"
//!
//! [export]
//! output_dir = "/srv/backups/grafana"
//! flows = ["dashboards", "alert_rules"]
//! alert_rule_formats = ["json"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_env};
pub use schema::{
    ApplicationConfig, ExportConfig, GrafanaConfig, GrafexConfig, LoggingConfig, RootsConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
