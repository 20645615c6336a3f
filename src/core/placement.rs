//! Item placement
//!
//! Maps content items to a directory and a file name under a flow's export
//! root. Directory comes from the folder tree; the file name is the
//! sanitized title plus the format extension.

use crate::core::tree::{Degradation, FolderTree};
use crate::domain::{ContentItem, ExportFormat, ItemUid};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Characters removed from titles when building a file stem
///
/// Control characters are removed as well.
pub const FILE_NAME_STRIP: &[char] = &[
    ' ', '/', '\\', ':', '[', ']', '*', '?', '"', '<', '>', '|',
];

/// Stem used when neither the title nor the uid leaves anything behind
pub const UNTITLED: &str = "untitled";

/// Strip filesystem-hostile characters from a title
///
/// Idempotent: stripping an already stripped stem changes nothing.
pub fn sanitize_file_stem(title: &str) -> String {
    title
        .chars()
        .filter(|c| !c.is_control() && !FILE_NAME_STRIP.contains(c))
        .collect()
}

/// Make a folder title usable as one directory component
///
/// Only separators and NUL are replaced, so titles keep their spaces.
pub fn sanitize_segment(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    match replaced.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => replaced,
    }
}

/// File name for an item: sanitized title, else sanitized uid, else
/// `untitled`, followed by the extension
pub fn file_name_for(title: &str, uid: &str, format: ExportFormat) -> String {
    let mut stem = sanitize_file_stem(title);
    if stem.is_empty() {
        stem = sanitize_file_stem(uid);
    }
    if stem.is_empty() {
        stem = UNTITLED.to_string();
    }
    format!("{stem}{}", format.extension())
}

/// Where one item goes on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub directory: PathBuf,
    pub file_name: String,
    pub degradation: Option<Degradation>,
}

impl Placement {
    /// Full path of the file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Places items of one flow under its root directory
///
/// Placing is pure. A path is only claimed once its file has actually
/// been written; a second item written to an already claimed path
/// overwrites it on disk, and the mapper logs the collision and counts it.
#[derive(Debug)]
pub struct PlacementMapper<'a> {
    tree: &'a FolderTree,
    root: PathBuf,
    claimed: HashMap<PathBuf, ItemUid>,
    collisions: usize,
}

impl<'a> PlacementMapper<'a> {
    pub fn new(tree: &'a FolderTree, root: impl Into<PathBuf>) -> Self {
        Self {
            tree,
            root: root.into(),
            claimed: HashMap::new(),
            collisions: 0,
        }
    }

    /// Export root of this mapper
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Place an item under the directory of its folder reference
    pub fn place(&self, item: &ContentItem, format: ExportFormat) -> Placement {
        let resolution = self.tree.resolve(item.folder_uid.as_ref());
        let directory = crate::core::tree::join_segments(&self.root, &resolution.segments);

        if let Some(degradation) = &resolution.degradation {
            tracing::warn!(
                kind = %item.kind,
                uid = %item.uid,
                degradation = %degradation,
                "Item placed with degraded folder path"
            );
        }

        self.place_in(directory, item, format, resolution.degradation)
    }

    /// Place an item in an explicit directory
    ///
    /// Used when the folder is known by something other than the item's
    /// folder reference.
    pub fn place_in(
        &self,
        directory: PathBuf,
        item: &ContentItem,
        format: ExportFormat,
        degradation: Option<Degradation>,
    ) -> Placement {
        Placement {
            directory,
            file_name: file_name_for(&item.title, item.uid.as_str(), format),
            degradation,
        }
    }

    /// Record that `uid` was written to the placement's path
    ///
    /// Returns true when a different item had already been written there.
    pub fn claim(&mut self, placement: &Placement, uid: &ItemUid) -> bool {
        let path = placement.path();
        match self.claimed.insert(path.clone(), uid.clone()) {
            Some(previous) if &previous != uid => {
                self.collisions += 1;
                tracing::warn!(
                    path = %path.display(),
                    uid = %uid,
                    previous_uid = %previous,
                    "File name collision, later item overwrites earlier one"
                );
                true
            }
            _ => false,
        }
    }

    /// Number of collisions seen so far
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
