//! Persisted task document: metadata block plus the ordered root tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::Task;

/// Schema version written by this binary. Documents at earlier versions are
/// handled by the migrator.
pub const SCHEMA_VERSION: u32 = 2;

/// Feature flag recorded once a document has been migrated to nested shape.
pub const FEATURE_NESTED_SUBTASKS: &str = "nested-subtasks";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub nested_subtasks_support: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_migration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_project_name() -> String {
    "untitled".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_schema_version() -> u32 {
    1
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            version: default_version(),
            schema_version: SCHEMA_VERSION,
            nested_subtasks_support: true,
            last_migration: None,
            features: vec![FEATURE_NESTED_SUBTASKS.to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub meta: DocumentMeta,
    pub tasks: Vec<Task>,
}

impl Document {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta {
                project_name: project_name.into(),
                ..DocumentMeta::default()
            },
            tasks: Vec::new(),
        }
    }

    pub fn find_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn find_task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Next root id: max existing root id (default 0) + 1.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }

    /// Append a root task, enforcing root-id uniqueness.
    pub fn push_task(&mut self, task: Task) -> Result<()> {
        if self.find_task(task.id).is_some() {
            return Err(Error::InvalidArgument(format!(
                "duplicate root task id {}",
                task.id
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove and return a root task by id.
    pub fn take_task(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Check the document-level invariant: root ids unique.
    pub fn check_unique_roots(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                return Err(Error::InvalidDocument(format!(
                    "duplicate root task id {}",
                    task.id
                )));
            }
        }
        Ok(())
    }
}
