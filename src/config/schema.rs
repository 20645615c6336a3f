//! Configuration schema types
//!
//! This module defines the configuration structure for grafex.

use crate::config::{secret_string_opt, SecretString};
use crate::domain::{ExportFlow, ExportFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main grafex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrafexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Platform API connection settings
    pub grafana: GrafanaConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GrafexConfig {
    /// Builds a configuration from `GRAFANA_API_URL` and `GRAFANA_API_KEY`
    ///
    /// Used when no configuration file is present. Every other setting
    /// takes its default; validation still applies.
    pub fn from_env() -> Self {
        let grafana = GrafanaConfig {
            base_url: std::env::var("GRAFANA_API_URL").unwrap_or_default(),
            api_key: secret_string_opt(std::env::var("GRAFANA_API_KEY").ok()),
            ..Default::default()
        };

        Self {
            application: ApplicationConfig::default(),
            grafana,
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.grafana.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Platform API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrafanaConfig {
    /// Base URL of the Grafana server, e.g. `https://grafana.example.com`
    pub base_url: String,

    /// Authentication type (bearer or basic)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Service account token or API key, sent as a Bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable this against a test instance with a self-signed
    /// certificate.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl GrafanaConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.trim().is_empty() {
            return Err(
                "grafana.base_url cannot be empty (set it in the config file or GRAFANA_API_URL)"
                    .to_string(),
            );
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("grafana.base_url is not a valid URL: {e}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("grafana.base_url must start with http:// or https://".to_string());
        }

        match self.auth_type.as_str() {
            "bearer" => {
                let missing = self
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().is_blank())
                    .unwrap_or(true);
                if missing {
                    return Err(
                        "grafana.api_key cannot be empty when auth_type is 'bearer' (set it in the config file or GRAFANA_API_KEY)"
                            .to_string(),
                    );
                }
            }
            "basic" => {
                if self
                    .username
                    .as_ref()
                    .map(|s| s.is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "grafana.username cannot be empty when auth_type is 'basic'".to_string()
                    );
                }

                if self
                    .password
                    .as_ref()
                    .map(|s| s.expose_secret().is_blank())
                    .unwrap_or(true)
                {
                    return Err(
                        "grafana.password cannot be empty when auth_type is 'basic'".to_string()
                    );
                }
            }
            other => {
                return Err(format!(
                    "Invalid auth_type '{other}'. Must be one of: bearer, basic"
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("grafana.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_type: default_auth_type(),
            api_key: None,
            username: None,
            password: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the per-flow roots are created under
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Flows to run, in order
    #[serde(default = "default_flows")]
    pub flows: Vec<ExportFlow>,

    /// Formats requested from the alert rule export endpoint
    #[serde(default = "default_alert_rule_formats")]
    pub alert_rule_formats: Vec<ExportFormat>,

    /// Format requested from the notification template endpoint
    #[serde(default = "default_notification_template_format")]
    pub notification_template_format: ExportFormat,

    /// Create a directory for every folder, even ones without dashboards
    #[serde(default = "default_true")]
    pub materialize_empty_folders: bool,

    /// Resolve and log every placement without touching the filesystem
    #[serde(default)]
    pub dry_run: bool,

    /// Per-flow root directories, relative to `output_dir`
    #[serde(default)]
    pub roots: RootsConfig,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.flows.is_empty() {
            return Err("export.flows cannot be empty".to_string());
        }

        for (i, flow) in self.flows.iter().enumerate() {
            if self.flows[..i].contains(flow) {
                return Err(format!("export.flows lists '{flow}' more than once"));
            }
        }

        if self.flows.contains(&ExportFlow::AlertRules) && self.alert_rule_formats.is_empty() {
            return Err(
                "export.alert_rule_formats cannot be empty when alert_rules is enabled"
                    .to_string(),
            );
        }

        self.roots.validate()?;
        Ok(())
    }

    /// Root directory for the dashboard flow
    pub fn dashboards_root(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join(&self.roots.dashboards)
    }

    /// Root directory for the alert rule flow in the given format
    pub fn alert_rules_root(&self, format: ExportFormat) -> PathBuf {
        let root = match format {
            ExportFormat::Json => &self.roots.alert_rules_json,
            ExportFormat::Hcl => &self.roots.alert_rules_hcl,
        };
        PathBuf::from(&self.output_dir).join(root)
    }

    /// Root directory for the datasource flow
    pub fn datasources_root(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join(&self.roots.datasources)
    }

    /// Root directory for the notification template flow
    pub fn notification_templates_root(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join(&self.roots.notification_templates)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            flows: default_flows(),
            alert_rule_formats: default_alert_rule_formats(),
            notification_template_format: default_notification_template_format(),
            materialize_empty_folders: true,
            dry_run: false,
            roots: RootsConfig::default(),
        }
    }
}

/// Root directory names, one per flow and format
///
/// Every flow gets its own default root, so aggregates and per-item files
/// of different flows never share a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootsConfig {
    #[serde(default = "default_dashboards_root")]
    pub dashboards: String,

    #[serde(default = "default_alert_rules_json_root")]
    pub alert_rules_json: String,

    #[serde(default = "default_alert_rules_hcl_root")]
    pub alert_rules_hcl: String,

    #[serde(default = "default_datasources_root")]
    pub datasources: String,

    #[serde(default = "default_notification_templates_root")]
    pub notification_templates: String,
}

impl RootsConfig {
    fn validate(&self) -> Result<(), String> {
        let roots = [
            ("dashboards", &self.dashboards),
            ("alert_rules_json", &self.alert_rules_json),
            ("alert_rules_hcl", &self.alert_rules_hcl),
            ("datasources", &self.datasources),
            ("notification_templates", &self.notification_templates),
        ];
        for (name, value) in roots {
            if value.trim().is_empty() {
                return Err(format!("export.roots.{name} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            dashboards: default_dashboards_root(),
            alert_rules_json: default_alert_rules_json_root(),
            alert_rules_hcl: default_alert_rules_hcl_root(),
            datasources: default_datasources_root(),
            notification_templates: default_notification_templates_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly or never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_type() -> String {
    "bearer".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_flows() -> Vec<ExportFlow> {
    ExportFlow::ALL.to_vec()
}

fn default_alert_rule_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Json, ExportFormat::Hcl]
}

fn default_notification_template_format() -> ExportFormat {
    ExportFormat::Hcl
}

fn default_dashboards_root() -> String {
    "grafana-dash-backup".to_string()
}

fn default_alert_rules_json_root() -> String {
    "grafana-alert-backup-json".to_string()
}

fn default_alert_rules_hcl_root() -> String {
    "grafana-alert-backup-hcl".to_string()
}

fn default_notification_templates_root() -> String {
    "grafana-notification-template-backup".to_string()
}

fn default_datasources_root() -> String {
    "grafana-datasource-backup".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
