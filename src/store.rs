//! Storage layer for tt
//!
//! Manages persistent state under the project root:
//! - `.tt.toml` - Project configuration (tracked)
//! - `.tt/tasks.json` - The task document
//! - `.tt/backups/` - Timestamped pre-migration snapshots
//!
//! The store is the only place the core touches the filesystem. Document
//! writes are atomic (temp file + rename) so readers never observe a
//! partial document.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{Error, Result};

/// Name of the project-local state directory
pub const LOCAL_DIR: &str = ".tt";

/// Name of the configuration file at the project root
pub const CONFIG_FILE: &str = ".tt.toml";

/// Name of the task document inside `.tt/`
pub const TASKS_FILE: &str = "tasks.json";

/// Name of the backups directory inside `.tt/`
pub const BACKUPS_DIR: &str = "backups";

/// Storage manager for a tt project
#[derive(Debug, Clone)]
pub struct Store {
    /// Path to the project root (where `.tt/` lives)
    project_root: PathBuf,
}

impl Store {
    /// Create a store rooted at the given project directory.
    pub fn open(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Walk upward from `start` until a directory containing `.tt/` is
    /// found. Fails with `NotInitialized` when none exists.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(LOCAL_DIR).is_dir() {
                return Ok(Self::open(dir.to_path_buf()));
            }
            current = dir.parent();
        }
        Err(Error::NotInitialized(start.to_path_buf()))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Path to the project-local `.tt/` directory
    pub fn local_dir(&self) -> PathBuf {
        self.project_root.join(LOCAL_DIR)
    }

    /// Path to the task document
    pub fn tasks_file(&self) -> PathBuf {
        self.local_dir().join(TASKS_FILE)
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.project_root.join(CONFIG_FILE)
    }

    /// Path to the backups directory
    pub fn backups_dir(&self) -> PathBuf {
        self.local_dir().join(BACKUPS_DIR)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Check if the project has been initialized
    pub fn is_initialized(&self) -> bool {
        self.local_dir().is_dir()
    }

    /// Create the `.tt/` directory structure and seed an empty document.
    /// Existing files are left alone.
    pub fn init(&self, project_name: &str) -> Result<bool> {
        fs::create_dir_all(self.local_dir())?;
        fs::create_dir_all(self.backups_dir())?;

        let tasks_file = self.tasks_file();
        if tasks_file.exists() {
            return Ok(false);
        }
        self.save(&Document::new(project_name))?;
        Ok(true)
    }

    // =========================================================================
    // Document load/save
    // =========================================================================

    /// Load the task document.
    ///
    /// A JSON object without a `tasks` array is rejected as
    /// `InvalidDocument` rather than a bare deserialization error.
    pub fn load(&self) -> Result<Document> {
        let path = self.tasks_file();
        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content)?;

        match value.get("tasks") {
            None => {
                return Err(Error::InvalidDocument(
                    "missing required 'tasks' collection".to_string(),
                ))
            }
            Some(tasks) if !tasks.is_array() => {
                return Err(Error::InvalidDocument(
                    "'tasks' must be an array".to_string(),
                ))
            }
            Some(_) => {}
        }

        let doc: Document = serde_json::from_value(value)?;
        doc.check_unique_roots()?;
        tracing::debug!(path = %path.display(), tasks = doc.tasks.len(), "loaded document");
        Ok(doc)
    }

    /// Save the task document atomically.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let path = self.tasks_file();
        self.write_json(&path, doc)?;
        tracing::debug!(path = %path.display(), tasks = doc.tasks.len(), "saved document");
        Ok(())
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename
    ///
    /// Readers never see partial writes; the file is either fully written
    /// or not at all.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// File-level copy primitive used by backup/restore. Creates the
    /// destination's parent directory when needed.
    pub fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(fs::copy(src, dst)?)
    }
}

// =============================================================================
// Utility functions
// =============================================================================

/// Ensure `.tt/` is in .gitignore if not already present
pub fn ensure_gitignore(project_root: &Path) -> std::io::Result<bool> {
    let gitignore_path = project_root.join(".gitignore");

    let existing = if gitignore_path.exists() {
        fs::read_to_string(&gitignore_path)?
    } else {
        String::new()
    };

    let already_ignored = existing.lines().any(|line| {
        let trimmed = line.trim();
        trimmed == ".tt" || trimmed == ".tt/" || trimmed == "/.tt" || trimmed == "/.tt/"
    });

    if already_ignored {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(".tt/\n");
    fs::write(&gitignore_path, updated)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn store_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let store = Store::open(root.clone());

        assert_eq!(store.local_dir(), root.join(".tt"));
        assert_eq!(store.tasks_file(), root.join(".tt/tasks.json"));
        assert_eq!(store.config_file(), root.join(".tt.toml"));
        assert_eq!(store.backups_dir(), root.join(".tt/backups"));
    }

    #[test]
    fn init_seeds_empty_document() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().to_path_buf());

        assert!(!store.is_initialized());
        assert!(store.init("demo").unwrap());
        assert!(store.is_initialized());

        let doc = store.load().unwrap();
        assert_eq!(doc.meta.project_name, "demo");
        assert!(doc.tasks.is_empty());

        // Second init leaves the document alone.
        assert!(!store.init("other").unwrap());
        assert_eq!(store.load().unwrap().meta.project_name, "demo");
    }

    #[test]
    fn discover_walks_upward() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        Store::open(root.clone()).init("demo").unwrap();

        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let store = Store::discover(&nested).unwrap();
        assert_eq!(store.project_root(), root.as_path());
    }

    #[test]
    fn discover_without_project_fails() {
        let temp = TempDir::new().unwrap();
        let err = Store::discover(temp.path()).unwrap_err();
        assert!(matches!(err, Error::NotInitialized(_)));
    }

    #[test]
    fn save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().to_path_buf());
        store.init("demo").unwrap();

        let mut doc = store.load().unwrap();
        doc.push_task(crate::task::Task::from_draft(
            1,
            crate::task::TaskDraft::titled("first"),
        ))
        .unwrap();
        store.save(&doc).unwrap();

        let back = store.load().unwrap();
        assert_eq!(back.tasks.len(), 1);
        assert_eq!(back.tasks[0].title, "first");
    }

    #[test]
    fn load_rejects_missing_tasks_collection() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().to_path_buf());
        store.init("demo").unwrap();

        fs::write(store.tasks_file(), r#"{"meta":{}}"#).unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            Error::InvalidDocument(_)
        ));

        fs::write(store.tasks_file(), r#"{"tasks":{}}"#).unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            Error::InvalidDocument(_)
        ));
    }

    #[test]
    fn copy_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().to_path_buf());

        let src = temp.path().join("src.txt");
        fs::write(&src, "payload").unwrap();

        let dst = temp.path().join("deep/nested/dst.txt");
        store.copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst).unwrap(), "payload");
    }

    #[test]
    fn gitignore_not_duplicated() {
        let temp = TempDir::new().unwrap();

        assert!(ensure_gitignore(temp.path()).unwrap());
        assert!(!ensure_gitignore(temp.path()).unwrap());

        let content = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(content.matches(".tt/").count(), 1);
    }
}
