//! Tree navigation by segment path.
//!
//! All lookups walk root-down through nested child collections. Absence is
//! an expected outcome and surfaces as `None`; callers that need an error
//! attach the appropriate kind themselves.

use crate::task::Task;

/// Locate the node at `path` below `root`. An empty path yields the root
/// itself. A segment that matches no sibling id, or a missing child
/// collection at a non-terminal segment, yields `None`.
pub fn find_node<'a>(root: &'a Task, path: &[u64]) -> Option<&'a Task> {
    let mut current = root;
    for segment in path {
        current = current
            .children()
            .iter()
            .find(|child| child.id == *segment)?;
    }
    Some(current)
}

/// Mutable variant of [`find_node`].
pub fn find_node_mut<'a>(root: &'a mut Task, path: &[u64]) -> Option<&'a mut Task> {
    let mut current = root;
    for segment in path {
        current = current
            .subtasks
            .as_mut()?
            .iter_mut()
            .find(|child| child.id == *segment)?;
    }
    Some(current)
}

/// Locate the sibling collection containing the node addressed by `path`.
///
/// For a 1-segment path the owner is `root` itself; for longer paths the
/// owner is resolved via [`find_node_mut`] on the path minus its last
/// segment. The owner's child collection is created empty when it was
/// previously absent. Returns `None` only when the owner cannot be located;
/// an empty path has no containing collection and also yields `None`.
pub fn find_container<'a>(root: &'a mut Task, path: &[u64]) -> Option<&'a mut Vec<Task>> {
    let (_, parent_path) = path.split_last()?;
    let owner = find_node_mut(root, parent_path)?;
    Some(owner.children_mut())
}
