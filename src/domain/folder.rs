//! Folder domain model
//!
//! A folder record as reported by the platform: an identifier, a display
//! title and an optional reference to the folder that contains it.

use super::ids::FolderUid;
use serde::{Deserialize, Serialize};

/// A folder in the platform's hierarchy
///
/// Titles are not unique across the platform; only `uid` is. A missing
/// `parent_uid` means the folder sits at the top level.
///
/// # Examples
///
/// ```
/// use grafex::domain::folder::FolderRecord;
/// use grafex::domain::ids::FolderUid;
///
/// let parent = FolderRecord::new(FolderUid::new("f1").unwrap(), "Team A");
/// let child = FolderRecord::new(FolderUid::new("f2").unwrap(), "Databases")
///     .with_parent(parent.uid.clone());
/// assert_eq!(child.parent_uid.as_ref(), Some(&parent.uid));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    /// Unique identifier
    pub uid: FolderUid,

    /// Display title, used as the directory name on disk
    pub title: String,

    /// Containing folder, if any
    pub parent_uid: Option<FolderUid>,
}

impl FolderRecord {
    /// Creates a top-level folder record
    pub fn new(uid: FolderUid, title: impl Into<String>) -> Self {
        Self {
            uid,
            title: title.into(),
            parent_uid: None,
        }
    }

    /// Sets the containing folder
    pub fn with_parent(mut self, parent_uid: FolderUid) -> Self {
        self.parent_uid = Some(parent_uid);
        self
    }

    /// Returns true if the folder declares no parent
    pub fn is_top_level(&self) -> bool {
        self.parent_uid.is_none()
    }
}
