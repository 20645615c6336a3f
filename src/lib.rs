// Grafex - Grafana configuration backup tool
// Copyright (c) 2025 Grafex Contributors
// Licensed under the MIT License

//! # grafex - Grafana configuration backup
//!
//! grafex exports dashboards, alert rules, datasources and notification
//! templates from a Grafana server into a directory tree that mirrors the
//! server's folder hierarchy, so the backup can live in version control.
//!
//! ## Overview
//!
//! - **Fetching** folder and item listings over the HTTP API
//! - **Resolving** every folder to its full root-to-leaf title path,
//!   surviving unknown parents and cycles
//! - **Placing** each item at `<root>/<folders...>/<Title>.<ext>` with a
//!   filesystem-safe file name
//! - **Writing** normalized JSON (sorted keys, 4-space indent) atomically
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Folder tree, placement, writer and export flows
//! - [`adapters`] - Grafana HTTP API integration
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grafex::config::load_config_or_env;
//! use grafex::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_env("grafex.toml")?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::from_config(config, shutdown_rx)?;
//!
//!     let summary = coordinator.execute_export().await?;
//!     println!("Wrote {} files", summary.files_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Folder resolution
//!
//! ```rust
//! use grafex::core::placement::PlacementMapper;
//! use grafex::core::tree::FolderTree;
//! use grafex::domain::{ContentItem, ExportFormat, FolderRecord, FolderUid, ItemUid, ResourceKind};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = FolderTree::build(vec![FolderRecord::new(FolderUid::new("f1")?, "Team A")]);
//! let mapper = PlacementMapper::new(&tree, "root");
//!
//! let item = ContentItem::new(ItemUid::new("d1")?, "CPU Alerts", ResourceKind::Dashboard)
//!     .in_folder(Some(FolderUid::new("f1")?));
//! let placement = mapper.place(&item, ExportFormat::Json);
//!
//! assert_eq!(placement.path(), Path::new("root/Team A/CPUAlerts.json"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result<T>`], an alias for
//! `std::result::Result<T, GrafexError>`. Per-item failures never abort a
//! run; they are collected in the export summary.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
