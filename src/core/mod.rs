//! Core business logic for grafex.
//!
//! # Modules
//!
//! - [`tree`] - Folder hierarchy resolution
//! - [`placement`] - Item placement and file name sanitization
//! - [`writer`] - Atomic file writes and payload normalization
//! - [`export`] - Export flows, coordination and the run summary
//!
//! # Export Workflow
//!
//! 1. **List folders**: fetch the flat folder listing once per run
//! 2. **Resolve**: build the [`tree::FolderTree`] with every folder's path
//! 3. **List items**: one listing call per flow
//! 4. **Place**: map each item to a directory and a sanitized file name
//! 5. **Write**: normalize the payload and replace the file atomically
//! 6. **Report**: generate the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use grafex::config::load_config;
//! use grafex::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("grafex.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::from_config(config, shutdown_rx)?;
//!
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Files written: {}", summary.files_written());
//! println!("Failed: {}", summary.items_failed());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod placement;
pub mod tree;
pub mod writer;
