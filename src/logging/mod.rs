//! Logging and observability
//!
//! Structured logging through `tracing`: human-readable console output and
//! an optional rotated JSON log file.
//!
//! # Example
//!
//! ```no_run
//! use grafex::logging::init_logging;
//! use grafex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(flow = "dashboards", "Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export flow
///
/// # Example
///
/// ```no_run
/// use grafex::log_flow_start;
/// use grafex::domain::ExportFlow;
/// use std::path::Path;
///
/// log_flow_start!(ExportFlow::Dashboards, Path::new("grafana-dash-backup"));
/// ```
#[macro_export]
macro_rules! log_flow_start {
    ($flow:expr, $root:expr) => {
        tracing::info!(
            flow = %$flow,
            root = %$root.display(),
            "Starting flow"
        );
    };
}

/// Log the completion of an export flow
///
/// # Example
///
/// ```no_run
/// use grafex::log_flow_complete;
/// use grafex::domain::ExportFlow;
/// use std::time::Duration;
///
/// log_flow_complete!(ExportFlow::Datasources, 12, Duration::from_millis(340));
/// ```
#[macro_export]
macro_rules! log_flow_complete {
    ($flow:expr, $files:expr, $duration:expr) => {
        tracing::info!(
            flow = %$flow,
            files_written = $files,
            duration_ms = $duration.as_millis() as u64,
            "Flow completed"
        );
    };
}

/// Log an item that was skipped because of an error
///
/// # Example
///
/// ```no_run
/// use grafex::log_item_skipped;
/// use grafex::domain::{ExportFlow, GrafexError};
///
/// let error = GrafexError::Filesystem("permission denied".to_string());
/// log_item_skipped!(ExportFlow::Dashboards, "abc123", &error);
/// ```
#[macro_export]
macro_rules! log_item_skipped {
    ($flow:expr, $uid:expr, $error:expr) => {
        tracing::warn!(
            flow = %$flow,
            uid = %$uid,
            error = %$error,
            "Skipping item"
        );
    };
}
