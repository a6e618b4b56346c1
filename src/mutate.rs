//! Structural mutation of the task tree.
//!
//! Every operation resolves its target through the navigator, preserves
//! sibling-id assignment (max + 1, no renumbering), and surfaces invalid
//! paths as errors rather than silently doing nothing.

use std::collections::{HashSet, VecDeque};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::id;
use crate::task::{DepRef, Task, TaskDraft, TaskPatch};
use crate::tree;

/// Outcome of an insertion: the created node and its full identifier.
#[derive(Debug)]
pub struct Inserted<'a> {
    pub full_id: String,
    pub node: &'a Task,
}

/// Insert a new subtask under the node at `parent_path` (empty path inserts
/// directly under `root`). The new sibling id is max existing sibling id
/// (default 0) + 1, and the node is appended, never reordered.
pub fn insert<'a>(
    root: &'a mut Task,
    parent_path: &[u64],
    draft: TaskDraft,
) -> Result<Inserted<'a>> {
    if draft.title.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "subtask title cannot be empty".to_string(),
        ));
    }

    let root_id = root.id;
    let parent = tree::find_node_mut(root, parent_path)
        .ok_or_else(|| Error::ContainerNotFound(id::join(root_id, parent_path)))?;

    let child_id = parent.next_child_id();
    let siblings = parent.children_mut();
    let index = siblings.len();
    siblings.push(Task::from_draft(child_id, draft));

    let mut path = parent_path.to_vec();
    path.push(child_id);

    Ok(Inserted {
        full_id: id::join(root_id, &path),
        node: &siblings[index],
    })
}

/// Remove the subtask at `path`, discarding its entire subtree, and return
/// the removed node.
pub fn remove(root: &mut Task, path: &[u64]) -> Result<Task> {
    let (last, parent_path) = path.split_last().ok_or(Error::EmptyPath)?;

    let root_id = root.id;
    let siblings = tree::find_container(root, path)
        .ok_or_else(|| Error::ContainerNotFound(id::join(root_id, parent_path)))?;

    let index = siblings
        .iter()
        .position(|child| child.id == *last)
        .ok_or_else(|| Error::NodeNotFound(id::join(root_id, path)))?;

    Ok(siblings.remove(index))
}

/// Apply a partial update to the node at `path` and return it.
///
/// `id` and the child collection are not representable in [`TaskPatch`],
/// so they cannot change here.
pub fn update<'a>(root: &'a mut Task, path: &[u64], patch: &TaskPatch) -> Result<&'a mut Task> {
    let root_id = root.id;
    let node = tree::find_node_mut(root, path)
        .ok_or_else(|| Error::NodeNotFound(id::join(root_id, path)))?;
    patch.apply(node);
    Ok(node)
}

/// One entry of a flattened subtree.
#[derive(Debug)]
pub struct FlatSubtask<'a> {
    pub node: &'a Task,
    pub full_id: String,
    pub path: Vec<u64>,
    pub depth: usize,
}

/// Lazy depth-first pre-order walk over every subtask below `root`.
///
/// The root itself is not emitted; direct subtasks have depth 1, and a
/// node's descendants are emitted before its next sibling.
pub fn flatten(root: &Task) -> Flatten<'_> {
    let mut stack = Vec::new();
    for child in root.children().iter().rev() {
        stack.push((child, vec![child.id]));
    }
    Flatten {
        root_id: root.id,
        stack,
    }
}

pub struct Flatten<'a> {
    root_id: u64,
    stack: Vec<(&'a Task, Vec<u64>)>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = FlatSubtask<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, path) = self.stack.pop()?;
        for child in node.children().iter().rev() {
            let mut child_path = path.clone();
            child_path.push(child.id);
            self.stack.push((child, child_path));
        }
        Some(FlatSubtask {
            node,
            full_id: id::join(self.root_id, &path),
            depth: path.len(),
            path,
        })
    }
}

/// Convert the root task `task_id` into a subtask of root task `parent_id`.
///
/// Rejected with `SelfReference` when both ids name the same task, and with
/// `CircularReference` when `parent_id` transitively depends on `task_id`.
/// The cycle check walks the dependency graph over root tasks, not the
/// containment tree. Returns the new full identifier.
pub fn demote(doc: &mut Document, task_id: u64, parent_id: u64) -> Result<String> {
    if task_id == parent_id {
        return Err(Error::SelfReference(task_id));
    }
    if doc.find_task(task_id).is_none() {
        return Err(Error::InvalidArgument(format!("task not found: {task_id}")));
    }
    if doc.find_task(parent_id).is_none() {
        return Err(Error::InvalidArgument(format!(
            "task not found: {parent_id}"
        )));
    }
    if depends_transitively(doc, parent_id, task_id) {
        return Err(Error::CircularReference {
            task: task_id,
            parent: parent_id,
        });
    }

    let mut moved = doc
        .take_task(task_id)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {task_id}")))?;
    let parent = doc
        .find_task_mut(parent_id)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {parent_id}")))?;

    let child_id = parent.next_child_id();
    moved.id = child_id;
    parent.children_mut().push(moved);

    Ok(id::join(parent_id, &[child_id]))
}

/// True when root task `from` can reach root task `target` by following
/// dependency edges (integer refs and the root segment of path refs).
fn depends_transitively(doc: &Document, from: u64, target: u64) -> bool {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(task) = doc.find_task(current) else {
            continue;
        };
        for dep in &task.dependencies {
            let Some(dep_root) = dep_root(dep) else {
                continue;
            };
            if dep_root == target {
                return true;
            }
            queue.push_back(dep_root);
        }
    }

    false
}

fn dep_root(dep: &DepRef) -> Option<u64> {
    match dep {
        DepRef::Id(id) => Some(*id),
        DepRef::Path(path) => path.split('.').next()?.parse().ok(),
    }
}
