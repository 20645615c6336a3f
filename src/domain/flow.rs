//! Export flows and output formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the export pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFlow {
    /// Dashboards, placed in their folder hierarchy
    Dashboards,
    /// Alert rule groups from the provisioning export
    AlertRules,
    /// Datasource definitions
    Datasources,
    /// Alert notification templates
    NotificationTemplates,
}

impl ExportFlow {
    /// All flows in the order a full run executes them
    pub const ALL: [ExportFlow; 4] = [
        ExportFlow::Dashboards,
        ExportFlow::AlertRules,
        ExportFlow::Datasources,
        ExportFlow::NotificationTemplates,
    ];

    /// Name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFlow::Dashboards => "dashboards",
            ExportFlow::AlertRules => "alert_rules",
            ExportFlow::Datasources => "datasources",
            ExportFlow::NotificationTemplates => "notification_templates",
        }
    }
}

impl fmt::Display for ExportFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "dashboards" => Ok(ExportFlow::Dashboards),
            "alert_rules" => Ok(ExportFlow::AlertRules),
            "datasources" => Ok(ExportFlow::Datasources),
            "notification_templates" => Ok(ExportFlow::NotificationTemplates),
            other => Err(format!(
                "Unknown export flow '{other}'. Must be one of: dashboards, alert_rules, datasources, notification_templates"
            )),
        }
    }
}

/// Serialization format requested from the API and written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured JSON document, normalized before writing
    Json,
    /// Terraform-style HCL text, written verbatim
    Hcl,
}

impl ExportFormat {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => ".json",
            ExportFormat::Hcl => ".hcl",
        }
    }

    /// Value of the `format` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Hcl => "hcl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "hcl" => Ok(ExportFormat::Hcl),
            other => Err(format!(
                "Unknown export format '{other}'. Must be one of: json, hcl"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_round_trips_through_str() {
        for flow in ExportFlow::ALL {
            assert_eq!(ExportFlow::from_str(flow.as_str()).unwrap(), flow);
        }
    }

    #[test]
    fn test_flow_accepts_kebab_case() {
        assert_eq!(
            ExportFlow::from_str("alert-rules").unwrap(),
            ExportFlow::AlertRules
        );
        assert!(ExportFlow::from_str("folders").is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ExportFormat::Json.extension(), ".json");
        assert_eq!(ExportFormat::Hcl.extension(), ".hcl");
        assert_eq!(ExportFormat::from_str("HCL").unwrap(), ExportFormat::Hcl);
        assert!(ExportFormat::from_str("yaml").is_err());
    }
}
