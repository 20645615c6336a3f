//! Content item domain model
//!
//! A content item is anything that ends up as one file on disk: a
//! dashboard, an alert rule group, a datasource or a notification template.

use super::ids::{FolderUid, ItemUid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a content item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Dashboard,
    AlertRuleGroup,
    Datasource,
    NotificationTemplate,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::AlertRuleGroup => "alert_rule_group",
            ResourceKind::Datasource => "datasource",
            ResourceKind::NotificationTemplate => "notification_template",
        };
        f.write_str(name)
    }
}

/// Summary of a content item taken from a listing call
///
/// The payload is fetched separately; this only carries what is needed to
/// decide where the file goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Identifier used to fetch the item's detail
    pub uid: ItemUid,

    /// Display title, sanitized into the file name
    pub title: String,

    /// Containing folder; `None` places the item at the export root
    pub folder_uid: Option<FolderUid>,

    /// What kind of object this is
    pub kind: ResourceKind,
}

impl ContentItem {
    /// Creates an item placed at the export root
    pub fn new(uid: ItemUid, title: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            uid,
            title: title.into(),
            folder_uid: None,
            kind,
        }
    }

    /// Sets the containing folder
    pub fn in_folder(mut self, folder_uid: Option<FolderUid>) -> Self {
        self.folder_uid = folder_uid;
        self
    }
}
