//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{ExportFlow, FetchError, GrafexError};
use std::time::Duration;

/// Result counters for one flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSummary {
    /// Flow these counters belong to
    pub flow: ExportFlow,

    /// Items found in the listing
    pub items_total: usize,

    /// Files written (or that would be written in dry-run mode)
    pub files_written: usize,

    /// Items skipped because fetching or writing failed
    pub items_failed: usize,

    /// Items placed with an orphan or cycle degradation
    pub degraded: usize,

    /// Items that overwrote another item of the same run
    pub collisions: usize,

    /// Empty folder directories materialized
    pub directories_created: usize,

    /// The listing call failed and nothing was exported
    pub aborted: bool,

    /// Shutdown was requested before all items were processed
    pub interrupted: bool,
}

impl FlowSummary {
    pub fn new(flow: ExportFlow) -> Self {
        Self {
            flow,
            items_total: 0,
            files_written: 0,
            items_failed: 0,
            degraded: 0,
            collisions: 0,
            directories_created: 0,
            aborted: false,
            interrupted: false,
        }
    }

    /// Check if the flow finished without failures
    pub fn is_successful(&self) -> bool {
        !self.aborted && !self.interrupted && self.items_failed == 0
    }
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// One entry per flow that was run, in run order
    pub flows: Vec<FlowSummary>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Shutdown was requested during the run
    pub interrupted: bool,

    /// Nothing was written to disk
    pub dry_run: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            flows: Vec::new(),
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            interrupted: false,
            dry_run: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record a finished flow
    pub fn add_flow(&mut self, flow: FlowSummary) {
        if flow.interrupted {
            self.interrupted = true;
        }
        self.flows.push(flow);
    }

    /// Counters for one flow, if it ran
    pub fn flow(&self, flow: ExportFlow) -> Option<&FlowSummary> {
        self.flows.iter().find(|f| f.flow == flow)
    }

    pub fn items_total(&self) -> usize {
        self.flows.iter().map(|f| f.items_total).sum()
    }

    pub fn files_written(&self) -> usize {
        self.flows.iter().map(|f| f.files_written).sum()
    }

    pub fn items_failed(&self) -> usize {
        self.flows.iter().map(|f| f.items_failed).sum()
    }

    pub fn degraded(&self) -> usize {
        self.flows.iter().map(|f| f.degraded).sum()
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.errors.is_empty() && self.flows.iter().all(FlowSummary::is_successful)
    }

    /// True when every flow that ran was aborted at its listing call
    pub fn all_flows_aborted(&self) -> bool {
        !self.flows.is_empty() && self.flows.iter().all(|f| f.aborted)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        for flow in &self.flows {
            tracing::info!(
                flow = %flow.flow,
                items = flow.items_total,
                files_written = flow.files_written,
                failed = flow.items_failed,
                degraded = flow.degraded,
                collisions = flow.collisions,
                directories_created = flow.directories_created,
                aborted = flow.aborted,
                "Flow result"
            );
        }

        tracing::info!(
            flows = self.flows.len(),
            items = self.items_total(),
            files_written = self.files_written(),
            failed = self.items_failed(),
            degraded = self.degraded(),
            duration_secs = self.duration.as_secs(),
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    flow = ?error.flow,
                    context = ?error.context,
                    message = %error.message,
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Server unreachable or request timed out
    Connection,
    /// Credentials rejected
    Authentication,
    /// Server answered with an error or an unusable body
    Fetch,
    /// Directory creation or file write failed
    Filesystem,
    /// Payload could not be normalized
    Serialization,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

impl From<&GrafexError> for ExportErrorType {
    fn from(err: &GrafexError) -> Self {
        match err {
            GrafexError::Fetch(FetchError::ConnectionFailed(_) | FetchError::Timeout(_)) => {
                ExportErrorType::Connection
            }
            GrafexError::Fetch(FetchError::AuthenticationFailed(_)) => {
                ExportErrorType::Authentication
            }
            GrafexError::Fetch(_) => ExportErrorType::Fetch,
            GrafexError::Filesystem(_) | GrafexError::Io(_) => ExportErrorType::Filesystem,
            GrafexError::Serialization(_) => ExportErrorType::Serialization,
            GrafexError::Configuration(_) | GrafexError::Validation(_) => {
                ExportErrorType::Configuration
            }
            GrafexError::Export(_) | GrafexError::Other(_) => ExportErrorType::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Flow the error happened in
    pub flow: Option<ExportFlow>,

    /// Error message
    pub message: String,

    /// Optional context (e.g., item uid or path)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            flow: None,
            message,
            context: None,
        }
    }

    /// Build an export error from a domain error, classifying it
    pub fn from_error(flow: ExportFlow, err: &GrafexError) -> Self {
        Self::new(ExportErrorType::from(err), err.to_string()).in_flow(flow)
    }

    /// Attach the flow
    pub fn in_flow(mut self, flow: ExportFlow) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();

        assert!(summary.flows.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(!summary.interrupted);
        assert!(summary.is_successful());
        assert!(!summary.all_flows_aborted());
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_totals_across_flows() {
        let mut summary = ExportSummary::new();

        let mut dashboards = FlowSummary::new(ExportFlow::Dashboards);
        dashboards.items_total = 10;
        dashboards.files_written = 9;
        dashboards.items_failed = 1;
        summary.add_flow(dashboards);

        let mut datasources = FlowSummary::new(ExportFlow::Datasources);
        datasources.items_total = 3;
        datasources.files_written = 4;
        summary.add_flow(datasources);

        assert_eq!(summary.items_total(), 13);
        assert_eq!(summary.files_written(), 13);
        assert_eq!(summary.items_failed(), 1);
        assert!(!summary.is_successful());
        assert_eq!(
            summary.flow(ExportFlow::Datasources).unwrap().files_written,
            4
        );
        assert!(summary.flow(ExportFlow::AlertRules).is_none());
    }

    #[test]
    fn test_interrupted_flow_marks_summary() {
        let mut summary = ExportSummary::new();
        let mut flow = FlowSummary::new(ExportFlow::Dashboards);
        flow.interrupted = true;
        summary.add_flow(flow);

        assert!(summary.interrupted);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_all_flows_aborted() {
        let mut summary = ExportSummary::new();
        let mut flow = FlowSummary::new(ExportFlow::Dashboards);
        flow.aborted = true;
        summary.add_flow(flow);
        assert!(summary.all_flows_aborted());

        summary.add_flow(FlowSummary::new(ExportFlow::Datasources));
        assert!(!summary.all_flows_aborted());
    }

    #[test]
    fn test_export_error_with_context() {
        let error = ExportError::new(ExportErrorType::Fetch, "Fetch failed".to_string())
            .in_flow(ExportFlow::Dashboards)
            .with_context("uid=d1".to_string());

        assert_eq!(error.error_type, ExportErrorType::Fetch);
        assert_eq!(error.flow, Some(ExportFlow::Dashboards));
        assert_eq!(error.context, Some("uid=d1".to_string()));
    }

    #[test]
    fn test_error_type_classification() {
        let cases = [
            (
                GrafexError::from(FetchError::Timeout("slow".to_string())),
                ExportErrorType::Connection,
            ),
            (
                GrafexError::from(FetchError::AuthenticationFailed("401".to_string())),
                ExportErrorType::Authentication,
            ),
            (
                GrafexError::from(FetchError::NotFound("gone".to_string())),
                ExportErrorType::Fetch,
            ),
            (
                GrafexError::Filesystem("disk full".to_string()),
                ExportErrorType::Filesystem,
            ),
            (
                GrafexError::Serialization("bad".to_string()),
                ExportErrorType::Serialization,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ExportErrorType::from(&err), expected);
        }
    }

    #[test]
    fn test_export_error_from_error() {
        let err = GrafexError::Filesystem("denied".to_string());
        let error = ExportError::from_error(ExportFlow::Datasources, &err);
        assert_eq!(error.error_type, ExportErrorType::Filesystem);
        assert_eq!(error.flow, Some(ExportFlow::Datasources));
        assert!(error.message.contains("denied"));
    }
}
