//! Backup and restore of the persisted document.
//!
//! Backups are taken before any migration step runs. Each backup is a
//! timestamped directory under `.tt/backups/` holding a copy of the task
//! document, the adjacent configuration, and a manifest. The location is
//! append-only: an existing backup is never overwritten, and files are
//! staged in a temporary directory and promoted with a single rename so a
//! partial copy is never observable as a usable backup.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{Store, CONFIG_FILE, TASKS_FILE};

/// Manifest file name inside each backup directory
pub const MANIFEST_FILE: &str = "backup.json";

/// Handle to one completed backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupHandle {
    pub id: Uuid,
    /// Directory name under `.tt/backups/`, `<timestamp>-<id prefix>`.
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// File names captured, relative to the backup directory.
    pub files: Vec<String>,
    /// Absolute backup directory; derived from the manifest location.
    #[serde(skip)]
    pub dir: PathBuf,
}

/// Summary of a completed restore.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub label: String,
    pub restored: Vec<String>,
}

/// Snapshot the task document and adjacent configuration.
pub fn create(store: &Store) -> Result<BackupHandle> {
    let tasks_file = store.tasks_file();
    if !tasks_file.exists() {
        return Err(Error::BackupFailed(format!(
            "no task document at {}",
            tasks_file.display()
        )));
    }

    let backups_root = store.backups_dir();
    fs::create_dir_all(&backups_root).map_err(backup_err)?;

    let id = Uuid::new_v4();
    let created_at = Utc::now();
    let label = format!(
        "{}-{}",
        created_at.format("%Y%m%dT%H%M%S%fZ"),
        &id.simple().to_string()[..8]
    );

    // Stage everything first; the staged tree only becomes a backup once
    // the final rename succeeds.
    let stage = tempfile::Builder::new()
        .prefix(".stage-")
        .tempdir_in(&backups_root)
        .map_err(backup_err)?;

    let mut files = Vec::new();
    store
        .copy_file(&tasks_file, &stage.path().join(TASKS_FILE))
        .map_err(|err| Error::BackupFailed(err.to_string()))?;
    files.push(TASKS_FILE.to_string());

    let config_file = store.config_file();
    if config_file.exists() {
        store
            .copy_file(&config_file, &stage.path().join(CONFIG_FILE))
            .map_err(|err| Error::BackupFailed(err.to_string()))?;
        files.push(CONFIG_FILE.to_string());
    }

    let final_dir = backups_root.join(&label);
    if final_dir.exists() {
        return Err(Error::BackupFailed(format!(
            "backup already exists: {label}"
        )));
    }

    let handle = BackupHandle {
        id,
        label,
        created_at,
        files,
        dir: final_dir.clone(),
    };
    store
        .write_json(&stage.path().join(MANIFEST_FILE), &handle)
        .map_err(|err| Error::BackupFailed(err.to_string()))?;

    fs::rename(stage.path(), &final_dir).map_err(backup_err)?;
    // The staged path no longer exists, so the TempDir drop is a no-op.

    tracing::debug!(label = %handle.label, "backup created");
    Ok(handle)
}

/// Copy the backed-up artifacts back over the live document and
/// configuration, unconditionally. The caller confirms intent.
pub fn restore(store: &Store, handle: &BackupHandle) -> Result<RestoreSummary> {
    if !handle.dir.is_dir() {
        return Err(Error::RestoreFailed(format!(
            "backup directory missing: {}",
            handle.dir.display()
        )));
    }

    let mut restored = Vec::new();
    for name in &handle.files {
        let src = handle.dir.join(name);
        let dst = match name.as_str() {
            TASKS_FILE => store.tasks_file(),
            CONFIG_FILE => store.config_file(),
            other => {
                return Err(Error::RestoreFailed(format!(
                    "unknown file in backup manifest: {other}"
                )))
            }
        };
        store
            .copy_file(&src, &dst)
            .map_err(|err| Error::RestoreFailed(err.to_string()))?;
        restored.push(name.clone());
    }

    Ok(RestoreSummary {
        label: handle.label.clone(),
        restored,
    })
}

/// Enumerate existing backups, newest first.
pub fn list(store: &Store) -> Result<Vec<BackupHandle>> {
    let backups_root = store.backups_dir();
    if !backups_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut handles = Vec::new();
    for entry in fs::read_dir(&backups_root)? {
        let entry = entry?;
        let dir = entry.path();
        let manifest = dir.join(MANIFEST_FILE);
        if !dir.is_dir() || !manifest.is_file() {
            continue;
        }
        let mut handle: BackupHandle = store.read_json(&manifest)?;
        handle.dir = dir;
        handles.push(handle);
    }

    handles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(handles)
}

/// Resolve a backup by label, id, or unique id prefix.
pub fn find(store: &Store, needle: &str) -> Result<BackupHandle> {
    let needle = needle.trim();
    let handles = list(store)?;

    let mut matches: Vec<BackupHandle> = handles
        .into_iter()
        .filter(|handle| {
            handle.label == needle
                || handle.id.to_string() == needle
                || handle.id.simple().to_string().starts_with(needle)
        })
        .collect();

    match matches.len() {
        0 => Err(Error::InvalidArgument(format!("backup not found: {needle}"))),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::InvalidArgument(format!(
            "ambiguous backup reference: {needle}"
        ))),
    }
}

fn backup_err(err: std::io::Error) -> Error {
    Error::BackupFailed(err.to_string())
}
