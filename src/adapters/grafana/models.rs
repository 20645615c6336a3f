//! Grafana API models
//!
//! Wire structures for the HTTP API. These are kept apart from the domain
//! models and only converted at the adapter boundary.

use crate::domain::ids::{FolderUid, ItemUid};
use crate::domain::{ContentItem, FetchError, FolderRecord, ResourceKind};
use serde::Deserialize;

/// Search result type for folders
pub const HIT_TYPE_FOLDER: &str = "dash-folder";

/// Search result type for dashboards
pub const HIT_TYPE_DASHBOARD: &str = "dash-db";

/// One entry of `GET /api/search`
///
/// Nested folders report their parent either in `parentUid` or in
/// `folderUid`, the same field a dashboard uses for its containing folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default)]
    pub hit_type: String,

    #[serde(default)]
    pub folder_uid: Option<String>,

    #[serde(default)]
    pub parent_uid: Option<String>,
}

impl SearchHit {
    /// Converts a folder hit into a folder record
    ///
    /// Returns `None` for hits without a usable uid.
    pub fn into_folder(self) -> Option<FolderRecord> {
        let uid = FolderUid::new(self.uid).ok()?;
        Some(FolderRecord {
            uid,
            title: self.title,
            parent_uid: FolderUid::from_reference(self.parent_uid)
                .or_else(|| FolderUid::from_reference(self.folder_uid)),
        })
    }

    /// Converts a dashboard hit into a content item
    ///
    /// Returns `None` for hits without a usable uid.
    pub fn into_dashboard(self) -> Option<ContentItem> {
        let uid = ItemUid::new(self.uid).ok()?;
        Some(
            ContentItem::new(uid, self.title, ResourceKind::Dashboard)
                .in_folder(FolderUid::from_reference(self.folder_uid)),
        )
    }
}

/// Body of `GET /api/dashboards/uid/{uid}`
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    #[serde(default)]
    pub dashboard: Option<serde_json::Value>,
}

impl DashboardEnvelope {
    /// Extracts the dashboard model
    pub fn into_dashboard(self, uid: &ItemUid) -> Result<serde_json::Value, FetchError> {
        self.dashboard.ok_or_else(|| {
            FetchError::InvalidResponse(format!(
                "response for dashboard {uid} has no 'dashboard' member"
            ))
        })
    }
}
