//! Folder tree resolution
//!
//! Turns the flat folder listing into root-to-leaf title paths. Every known
//! folder is resolved once when the tree is built; lookups afterwards are
//! plain map reads.

use crate::core::placement::sanitize_segment;
use crate::domain::{FolderRecord, FolderUid};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a resolution is only best-effort
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The walk reached a folder identifier that is not in the listing
    Orphan { missing: FolderUid },

    /// The walk came back to a folder it had already visited
    Cycle { at: FolderUid },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::Orphan { missing } => write!(f, "unknown parent folder '{missing}'"),
            Degradation::Cycle { at } => write!(f, "folder cycle at '{at}'"),
        }
    }
}

/// Resolved path of one folder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Folder titles, oldest ancestor first
    pub segments: Vec<String>,

    /// Set when the ancestor chain was broken or cyclic
    pub degradation: Option<Degradation>,
}

impl Resolution {
    fn orphan(missing: FolderUid) -> Self {
        Self {
            segments: Vec::new(),
            degradation: Some(Degradation::Orphan { missing }),
        }
    }

    /// Returns true if the path was computed from a complete ancestor chain
    pub fn is_exact(&self) -> bool {
        self.degradation.is_none()
    }
}

/// Memoized folder hierarchy for one export run
///
/// # Example
///
/// ```rust
/// use grafex::core::tree::FolderTree;
/// use grafex::domain::{FolderRecord, FolderUid};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let folders = vec![
///     FolderRecord::new(FolderUid::new("f1")?, "Team A"),
///     FolderRecord::new(FolderUid::new("f2")?, "Databases").with_parent(FolderUid::new("f1")?),
/// ];
/// let tree = FolderTree::build(folders);
///
/// let uid = FolderUid::new("f2")?;
/// assert_eq!(tree.resolve(Some(&uid)).segments, vec!["Team A", "Databases"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    records: HashMap<FolderUid, FolderRecord>,
    order: Vec<FolderUid>,
    resolved: HashMap<FolderUid, Resolution>,
    root: Resolution,
}

impl FolderTree {
    /// Build the tree and resolve every folder in it
    ///
    /// When the listing contains the same identifier twice, the later
    /// record wins.
    pub fn build(folders: Vec<FolderRecord>) -> Self {
        let mut records = HashMap::with_capacity(folders.len());
        let mut order = Vec::with_capacity(folders.len());

        for folder in folders {
            if records.contains_key(&folder.uid) {
                tracing::warn!(uid = %folder.uid, "Duplicate folder uid in listing, keeping the last one");
            } else {
                order.push(folder.uid.clone());
            }
            records.insert(folder.uid.clone(), folder);
        }

        let mut resolved = HashMap::with_capacity(records.len());
        for uid in &order {
            let resolution = walk(&records, uid);
            if let Some(degradation) = &resolution.degradation {
                tracing::warn!(
                    uid = %uid,
                    path = %resolution.segments.join("/"),
                    degradation = %degradation,
                    "Folder path resolved with degradation"
                );
            }
            resolved.insert(uid.clone(), resolution);
        }

        tracing::debug!(folders = order.len(), "Folder tree built");

        Self {
            records,
            order,
            resolved,
            root: Resolution::default(),
        }
    }

    /// Resolve a folder reference to its path segments
    ///
    /// `None` is the export root. An identifier that is not in the tree
    /// also lands at the root, flagged as an orphan.
    pub fn resolve(&self, uid: Option<&FolderUid>) -> Resolution {
        match uid {
            None => self.root.clone(),
            Some(uid) => self
                .resolved
                .get(uid)
                .cloned()
                .unwrap_or_else(|| Resolution::orphan(uid.clone())),
        }
    }

    /// Directory for a folder reference under `root`
    pub fn directory_for(&self, root: &Path, uid: Option<&FolderUid>) -> PathBuf {
        join_segments(root, &self.resolve(uid).segments)
    }

    /// Identifier of the only folder with this title
    ///
    /// Returns `None` when no folder, or more than one, carries the title.
    pub fn uid_for_title(&self, title: &str) -> Option<&FolderUid> {
        let mut matches = self
            .order
            .iter()
            .filter(|uid| self.records.get(*uid).is_some_and(|r| r.title == title));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Known folder identifiers in listing order
    pub fn folder_uids(&self) -> impl Iterator<Item = &FolderUid> {
        self.order.iter()
    }

    /// Look up the raw record for a folder
    pub fn get(&self, uid: &FolderUid) -> Option<&FolderRecord> {
        self.records.get(uid)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of folders whose resolution is degraded
    pub fn degraded_count(&self) -> usize {
        self.resolved.values().filter(|r| !r.is_exact()).count()
    }
}

/// Join sanitized segments onto a root directory
pub fn join_segments(root: &Path, segments: &[String]) -> PathBuf {
    let mut dir = root.to_path_buf();
    for segment in segments {
        dir.push(sanitize_segment(segment));
    }
    dir
}

/// Walk from `start` towards the root, collecting titles leaf first
fn walk(records: &HashMap<FolderUid, FolderRecord>, start: &FolderUid) -> Resolution {
    // (uid, title) in walk order, leaf first
    let mut chain: Vec<(&FolderUid, &str)> = Vec::new();
    let mut visited: HashSet<&FolderUid> = HashSet::new();
    let mut current = start;
    let mut degradation = None;

    loop {
        if !visited.insert(current) {
            // Everything walked after `current` sits on the cycle; the
            // path is rooted at `current`.
            if let Some(pos) = chain.iter().position(|(uid, _)| *uid == current) {
                chain.truncate(pos + 1);
            }
            degradation = Some(Degradation::Cycle {
                at: current.clone(),
            });
            break;
        }

        let Some(record) = records.get(current) else {
            degradation = Some(Degradation::Orphan {
                missing: current.clone(),
            });
            break;
        };

        chain.push((&record.uid, record.title.as_str()));

        match &record.parent_uid {
            Some(parent) => current = parent,
            None => break,
        }
    }

    Resolution {
        segments: chain.iter().rev().map(|(_, title)| title.to_string()).collect(),
        degradation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> FolderUid {
        FolderUid::new(s).unwrap()
    }

    fn folder(id: &str, title: &str, parent: Option<&str>) -> FolderRecord {
        let record = FolderRecord::new(uid(id), title);
        match parent {
            Some(p) => record.with_parent(uid(p)),
            None => record,
        }
    }

    #[test]
    fn test_absent_reference_is_root() {
        let tree = FolderTree::build(vec![folder("f1", "Team A", None)]);
        let resolution = tree.resolve(None);
        assert!(resolution.segments.is_empty());
        assert!(resolution.is_exact());
    }

    #[test]
    fn test_top_level_folder() {
        let tree = FolderTree::build(vec![folder("f1", "Team A", None)]);
        let resolution = tree.resolve(Some(&uid("f1")));
        assert_eq!(resolution.segments, vec!["Team A"]);
        assert!(resolution.is_exact());
    }

    #[test]
    fn test_segments_are_root_to_leaf() {
        let tree = FolderTree::build(vec![
            folder("leaf", "Leaf", Some("mid")),
            folder("mid", "Mid", Some("top")),
            folder("top", "Top", None),
        ]);
        let resolution = tree.resolve(Some(&uid("leaf")));
        assert_eq!(resolution.segments, vec!["Top", "Mid", "Leaf"]);
        assert!(resolution.is_exact());
    }

    #[test]
    fn test_each_parent_precedes_child() {
        let tree = FolderTree::build(vec![
            folder("a", "A", None),
            folder("b", "B", Some("a")),
            folder("c", "C", Some("b")),
            folder("d", "D", Some("c")),
        ]);
        for id in ["b", "c", "d"] {
            let child = tree.resolve(Some(&uid(id)));
            let parent_uid = tree.get(&uid(id)).unwrap().parent_uid.clone().unwrap();
            let parent = tree.resolve(Some(&parent_uid));
            assert_eq!(child.segments.len(), parent.segments.len() + 1);
            assert_eq!(&child.segments[..parent.segments.len()], &parent.segments[..]);
        }
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let tree = FolderTree::build(vec![
            folder("a", "A", Some("b")),
            folder("b", "B", Some("a")),
        ]);

        let resolution = tree.resolve(Some(&uid("a")));
        assert_eq!(resolution.segments, vec!["A"]);
        assert_eq!(
            resolution.degradation,
            Some(Degradation::Cycle { at: uid("a") })
        );

        let resolution = tree.resolve(Some(&uid("b")));
        assert_eq!(resolution.segments, vec!["B"]);
        assert!(resolution.segments.len() <= 1);
    }

    #[test]
    fn test_self_cycle_terminates() {
        let tree = FolderTree::build(vec![folder("a", "A", Some("a"))]);
        let resolution = tree.resolve(Some(&uid("a")));
        assert_eq!(resolution.segments, vec!["A"]);
        assert!(matches!(resolution.degradation, Some(Degradation::Cycle { .. })));
    }

    #[test]
    fn test_path_entering_cycle_is_rooted_at_entry() {
        // x -> a -> b -> c -> a
        let tree = FolderTree::build(vec![
            folder("x", "X", Some("a")),
            folder("a", "A", Some("b")),
            folder("b", "B", Some("c")),
            folder("c", "C", Some("a")),
        ]);
        let resolution = tree.resolve(Some(&uid("x")));
        assert_eq!(resolution.segments, vec!["A", "X"]);
        assert_eq!(
            resolution.degradation,
            Some(Degradation::Cycle { at: uid("a") })
        );
    }

    #[test]
    fn test_orphan_keeps_accumulated_segments() {
        let tree = FolderTree::build(vec![
            folder("child", "Child", Some("parent")),
            folder("parent", "Parent", Some("gone")),
        ]);
        let resolution = tree.resolve(Some(&uid("child")));
        assert_eq!(resolution.segments, vec!["Parent", "Child"]);
        assert_eq!(
            resolution.degradation,
            Some(Degradation::Orphan { missing: uid("gone") })
        );
    }

    #[test]
    fn test_unknown_uid_lands_at_root() {
        let tree = FolderTree::build(vec![folder("f1", "Team A", None)]);
        let unknown = tree.resolve(Some(&uid("missing")));
        let root = tree.resolve(None);
        assert_eq!(unknown.segments, root.segments);
        assert_eq!(
            unknown.degradation,
            Some(Degradation::Orphan { missing: uid("missing") })
        );
    }

    #[test]
    fn test_unknown_uid_in_empty_tree() {
        let tree = FolderTree::build(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.resolve(Some(&uid("x"))).segments.is_empty());
    }

    #[test]
    fn test_directory_for_sanitizes_segments() {
        let tree = FolderTree::build(vec![
            folder("f1", "Team A", None),
            folder("f2", "Ops/Infra", Some("f1")),
        ]);
        let dir = tree.directory_for(Path::new("root"), Some(&uid("f2")));
        assert_eq!(dir, Path::new("root").join("Team A").join("Ops_Infra"));
    }

    #[test]
    fn test_uid_for_title_unique_only() {
        let tree = FolderTree::build(vec![
            folder("f1", "Team A", None),
            folder("f2", "Shared", None),
            folder("f3", "Shared", Some("f1")),
        ]);
        assert_eq!(tree.uid_for_title("Team A"), Some(&uid("f1")));
        assert_eq!(tree.uid_for_title("Shared"), None);
        assert_eq!(tree.uid_for_title("Nope"), None);
    }

    #[test]
    fn test_folder_uids_keep_listing_order() {
        let tree = FolderTree::build(vec![
            folder("z", "Z", None),
            folder("a", "A", None),
            folder("m", "M", Some("a")),
        ]);
        let uids: Vec<&str> = tree.folder_uids().map(FolderUid::as_str).collect();
        assert_eq!(uids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_uid_last_record_wins() {
        let tree = FolderTree::build(vec![
            folder("f1", "Old", None),
            folder("f1", "New", None),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.resolve(Some(&uid("f1"))).segments, vec!["New"]);
    }

    #[test]
    fn test_degraded_count() {
        let tree = FolderTree::build(vec![
            folder("a", "A", Some("b")),
            folder("b", "B", Some("a")),
            folder("c", "C", Some("missing")),
            folder("d", "D", None),
        ]);
        assert_eq!(tree.degraded_count(), 3);
    }
}
