//! Task tree data model.
//!
//! A single recursive node type covers root tasks and subtasks alike: a
//! root task's id is unique across the document, a subtask's id is unique
//! only among its immediate siblings. Navigation is root-down by path, so
//! nodes carry no parent back-pointers.

use serde::{Deserialize, Serialize};

/// Workflow status of a task or subtask. No transition graph is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Done,
    Deferred,
    Cancelled,
    Review,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Done => "done",
            Status::Deferred => "deferred",
            Status::Cancelled => "cancelled",
            Status::Review => "review",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A dependency reference: either a root task id or a subtask path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepRef {
    Id(u64),
    Path(String),
}

impl std::fmt::Display for DepRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepRef::Id(id) => write!(f, "{id}"),
            DepRef::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Migration state of a node's child collection.
///
/// Documents written before nested-subtask support omit the `subtasks`
/// field entirely; migrated nodes always carry it, possibly empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskState {
    Unmigrated,
    MigratedEmpty,
    MigratedNonempty,
}

/// A work item. Root tasks and subtasks share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DepRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test_strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Task>>,
}

impl Task {
    /// Build a node from a draft, with an explicitly empty child collection.
    pub fn from_draft(id: u64, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            dependencies: draft.dependencies,
            details: draft.details.unwrap_or_default(),
            test_strategy: draft.test_strategy.unwrap_or_default(),
            subtasks: Some(Vec::new()),
        }
    }

    /// Direct children, empty when the collection is absent or empty.
    pub fn children(&self) -> &[Task] {
        self.subtasks.as_deref().unwrap_or(&[])
    }

    /// Child collection, created on first access.
    pub fn children_mut(&mut self) -> &mut Vec<Task> {
        self.subtasks.get_or_insert_with(Vec::new)
    }

    /// Three-state migration flag for this node's child collection.
    pub fn subtask_state(&self) -> SubtaskState {
        match &self.subtasks {
            None => SubtaskState::Unmigrated,
            Some(children) if children.is_empty() => SubtaskState::MigratedEmpty,
            Some(_) => SubtaskState::MigratedNonempty,
        }
    }

    /// Next sibling id for a new child: max existing id (default 0) + 1.
    /// Surviving siblings are never renumbered.
    pub fn next_child_id(&self) -> u64 {
        self.children().iter().map(|child| child.id).max().unwrap_or(0) + 1
    }
}

/// Payload for creating a new task or subtask.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub dependencies: Vec<DepRef>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub test_strategy: Option<String>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing node.
///
/// The allow-list of mutable fields is the struct itself: `id` and
/// `subtasks` have no member here, so a patch cannot touch them. A
/// deserialized patch silently drops unknown keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub dependencies: Option<Vec<DepRef>>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub test_strategy: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.dependencies.is_none()
            && self.details.is_none()
            && self.test_strategy.is_none()
    }

    /// Apply every present field to `task` in place.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(dependencies) = &self.dependencies {
            task.dependencies = dependencies.clone();
        }
        if let Some(details) = &self.details {
            task.details = details.clone();
        }
        if let Some(test_strategy) = &self.test_strategy {
            task.test_strategy = test_strategy.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: Status = serde_json::from_str("\"deferred\"").unwrap();
        assert_eq!(back, Status::Deferred);
    }

    #[test]
    fn dep_ref_accepts_ids_and_paths() {
        let deps: Vec<DepRef> = serde_json::from_str(r#"[3, "1.2"]"#).unwrap();
        assert_eq!(deps, vec![DepRef::Id(3), DepRef::Path("1.2".to_string())]);
        assert_eq!(serde_json::to_string(&deps).unwrap(), r#"[3,"1.2"]"#);
    }

    #[test]
    fn subtask_state_tracks_three_states() {
        let mut task = Task::from_draft(1, TaskDraft::titled("t"));
        assert_eq!(task.subtask_state(), SubtaskState::MigratedEmpty);

        task.children_mut()
            .push(Task::from_draft(1, TaskDraft::titled("child")));
        assert_eq!(task.subtask_state(), SubtaskState::MigratedNonempty);

        task.subtasks = None;
        assert_eq!(task.subtask_state(), SubtaskState::Unmigrated);
    }

    #[test]
    fn absent_and_empty_subtasks_round_trip_distinctly() {
        let unmigrated = r#"{"id":1,"title":"t"}"#;
        let task: Task = serde_json::from_str(unmigrated).unwrap();
        assert_eq!(task.subtask_state(), SubtaskState::Unmigrated);
        assert!(!serde_json::to_string(&task).unwrap().contains("subtasks"));

        let migrated = r#"{"id":1,"title":"t","subtasks":[]}"#;
        let task: Task = serde_json::from_str(migrated).unwrap();
        assert_eq!(task.subtask_state(), SubtaskState::MigratedEmpty);
        assert!(serde_json::to_string(&task)
            .unwrap()
            .contains("\"subtasks\":[]"));
    }

    #[test]
    fn patch_ignores_unknown_fields() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"id":99,"subtasks":[{"id":1,"title":"x"}],"title":"new"}"#)
                .unwrap();
        assert_eq!(patch.title.as_deref(), Some("new"));

        let mut task = Task::from_draft(1, TaskDraft::titled("old"));
        patch.apply(&mut task);
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "new");
        assert_eq!(task.children().len(), 0);
    }

    #[test]
    fn next_child_id_is_max_plus_one() {
        let mut task = Task::from_draft(1, TaskDraft::titled("t"));
        task.children_mut()
            .push(Task::from_draft(1, TaskDraft::titled("a")));
        task.children_mut()
            .push(Task::from_draft(4, TaskDraft::titled("b")));
        assert_eq!(task.next_child_id(), 5);

        task.children_mut().retain(|child| child.id != 4);
        assert_eq!(task.next_child_id(), 2);
    }
}
