//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers Grafana hands out. Folder and item
//! identifiers live in different namespaces on the platform, so they get
//! separate types even though both are plain strings on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Folder identifier newtype wrapper
///
/// Represents the `uid` of a Grafana folder. Content items and nested
/// folders reference their containing folder by this value.
///
/// # Examples
///
/// ```
/// use grafex::domain::ids::FolderUid;
/// use std::str::FromStr;
///
/// let uid = FolderUid::from_str("bdx3k2a8").unwrap();
/// assert_eq!(uid.as_str(), "bdx3k2a8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FolderUid(String);

impl FolderUid {
    /// Creates a new FolderUid from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(FolderUid)` if the identifier is non-blank, `Err` otherwise
    pub fn new(uid: impl Into<String>) -> Result<Self, String> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return Err("Folder UID cannot be empty".to_string());
        }
        Ok(Self(uid))
    }

    /// Converts an optional reference read from the API into a folder UID.
    ///
    /// Grafana reports "no folder" either by omitting the field or by
    /// sending an empty string; both map to `None`.
    pub fn from_reference(reference: Option<String>) -> Option<Self> {
        reference.and_then(|r| Self::new(r).ok())
    }

    /// Returns the folder UID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FolderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FolderUid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for FolderUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Content item identifier newtype wrapper
///
/// Dashboards carry a Grafana `uid`; alert rule groups, datasources and
/// templates are keyed by whatever stable identifier their listing offers
/// (group name, datasource uid, template name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemUid(String);

impl ItemUid {
    /// Creates a new ItemUid from a string
    pub fn new(uid: impl Into<String>) -> Result<Self, String> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return Err("Item UID cannot be empty".to_string());
        }
        Ok(Self(uid))
    }

    /// Identifier for a listing entry that carries none of its own,
    /// built from its position in the listing
    pub fn positional(prefix: &str, index: usize) -> Self {
        Self(format!("{prefix}-{index}"))
    }

    /// Returns the item UID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemUid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ItemUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_uid_valid() {
        let uid = FolderUid::new("f1").unwrap();
        assert_eq!(uid.as_str(), "f1");
        assert_eq!(uid.to_string(), "f1");
    }

    #[test]
    fn test_folder_uid_blank_rejected() {
        assert!(FolderUid::new("").is_err());
        assert!(FolderUid::new("   ").is_err());
    }

    #[test]
    fn test_folder_uid_from_reference() {
        assert_eq!(
            FolderUid::from_reference(Some("abc".to_string())),
            Some(FolderUid::new("abc").unwrap())
        );
        assert_eq!(FolderUid::from_reference(Some(String::new())), None);
        assert_eq!(FolderUid::from_reference(None), None);
    }

    #[test]
    fn test_folder_uid_into_inner() {
        let uid = FolderUid::from_str("team-a").unwrap();
        assert_eq!(uid.into_inner(), "team-a".to_string());
    }

    #[test]
    fn test_item_uid_valid_and_blank() {
        assert_eq!(ItemUid::new("dash-1").unwrap().as_str(), "dash-1");
        assert!(ItemUid::from_str("").is_err());
        assert_eq!(ItemUid::positional("datasource", 3).as_str(), "datasource-3");
    }

    #[test]
    fn test_ids_serde_transparent() {
        let uid = FolderUid::new("f1").unwrap();
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, "\"f1\"");
        let back: FolderUid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uid);
    }
}
