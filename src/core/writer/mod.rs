//! Export writer
//!
//! Single write path shared by every flow. Directories are created on
//! demand, files are replaced atomically through a temporary file in the
//! target directory, and dry-run mode skips all filesystem changes.

pub mod payload;

use crate::domain::{GrafexError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes exported documents to disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportWriter {
    dry_run: bool,
}

impl ExportWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Create a directory and its parents
    ///
    /// An existing directory is fine.
    pub fn ensure_directory(&self, dir: &Path) -> Result<()> {
        if self.dry_run {
            tracing::debug!(path = %dir.display(), "Dry run: would create directory");
            return Ok(());
        }

        std::fs::create_dir_all(dir).map_err(|e| {
            GrafexError::Filesystem(format!(
                "Failed to create directory {}: {e}",
                dir.display()
            ))
        })
    }

    /// Write raw bytes to `dir/file_name`, replacing any existing file
    ///
    /// Returns the path of the written file.
    pub fn write(&self, dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = dir.join(file_name);

        if self.dry_run {
            tracing::info!(
                path = %path.display(),
                bytes = contents.len(),
                "Dry run: would write file"
            );
            return Ok(path);
        }

        self.ensure_directory(dir)?;

        let fs_error = |action: &str, e: std::io::Error| {
            GrafexError::Filesystem(format!("Failed to {action} {}: {e}", path.display()))
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fs_error("stage", e))?;
        tmp.write_all(contents).map_err(|e| fs_error("write", e))?;
        tmp.flush().map_err(|e| fs_error("flush", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| fs_error("set permissions on", e))?;
        }

        tmp.persist(&path).map_err(|e| fs_error("replace", e.error))?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(path)
    }

    /// Write text ending in exactly one newline
    pub fn write_text(&self, dir: &Path, file_name: &str, text: &str) -> Result<PathBuf> {
        let text = payload::with_trailing_newline(text);
        self.write(dir, file_name, text.as_bytes())
    }

    /// Write a JSON value in canonical form
    pub fn write_json(
        &self,
        dir: &Path,
        file_name: &str,
        value: &serde_json::Value,
    ) -> Result<PathBuf> {
        let text = payload::to_canonical_json(value)?;
        self.write_text(dir, file_name, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        let writer = ExportWriter::new(false);

        let path = writer.write(&dir, "x.json", b"{}\n").unwrap();
        assert_eq!(path, dir.join("x.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let writer = ExportWriter::new(false);

        writer.write_text(temp.path(), "x.hcl", "old content that is longer").unwrap();
        writer.write_text(temp.path(), "x.hcl", "new").unwrap();

        let content = std::fs::read_to_string(temp.path().join("x.hcl")).unwrap();
        assert_eq!(content, "new\n");
    }

    #[test]
    fn test_write_text_single_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let writer = ExportWriter::new(false);

        writer.write_text(temp.path(), "a.hcl", "resource {}\n\n\n").unwrap();
        let content = std::fs::read_to_string(temp.path().join("a.hcl")).unwrap();
        assert_eq!(content, "resource {}\n");
    }

    #[test]
    fn test_write_json_is_canonical() {
        let temp = TempDir::new().unwrap();
        let writer = ExportWriter::new(false);

        writer.write_json(temp.path(), "d.json", &json!({"b": 1, "a": 2})).unwrap();
        let content = std::fs::read_to_string(temp.path().join("d.json")).unwrap();
        assert_eq!(content, "{\n    \"a\": 2,\n    \"b\": 1\n}\n");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let writer = ExportWriter::new(false);

        writer.write_text(temp.path(), "one.json", "1").unwrap();
        writer.write_text(temp.path(), "two.json", "2").unwrap();

        let mut names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["one.json", "two.json"]);
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Team A");
        let writer = ExportWriter::new(false);

        writer.ensure_directory(&dir).unwrap();
        writer.ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("sub");
        let writer = ExportWriter::new(true);

        let path = writer.write_text(&dir, "x.json", "{}").unwrap();
        writer.ensure_directory(&temp.path().join("other")).unwrap();

        assert_eq!(path, dir.join("x.json"));
        assert!(!dir.exists());
        assert!(!temp.path().join("other").exists());
    }

    #[test]
    fn test_write_fails_when_directory_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let writer = ExportWriter::new(false);

        let result = writer.write(&blocker.join("sub"), "x.json", b"{}");
        assert!(matches!(result, Err(GrafexError::Filesystem(_))));
    }
}
