//! Export orchestration
//!
//! This module provides the export logic for grafex, including:
//! - The four export flows
//! - Export coordination and orchestration
//! - Summary and reporting

pub mod coordinator;
pub mod flows;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use flows::FlowContext;
pub use summary::{ExportError, ExportErrorType, ExportSummary, FlowSummary};
