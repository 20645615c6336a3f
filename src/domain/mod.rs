//! Domain models and types for grafex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`FolderUid`], [`ItemUid`])
//! - **Domain models** ([`FolderRecord`], [`ContentItem`])
//! - **Flow selectors** ([`ExportFlow`], [`ExportFormat`])
//! - **Error types** ([`GrafexError`], [`FetchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Folder and item identifiers are separate newtypes so a dashboard uid can
//! never be looked up in the folder tree by mistake:
//!
//! ```rust
//! use grafex::domain::{FolderUid, ItemUid};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let folder = FolderUid::new("f1")?;
//! let dashboard = ItemUid::new("d1")?;
//!
//! // This won't compile
//! // let wrong: FolderUid = dashboard;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod flow;
pub mod folder;
pub mod ids;
pub mod item;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FetchError, GrafexError};
pub use flow::{ExportFlow, ExportFormat};
pub use folder::FolderRecord;
pub use ids::{FolderUid, ItemUid};
pub use item::{ContentItem, ResourceKind};
pub use result::Result;
