//! Dependency validation over a single root task's subtree.
//!
//! A reference is valid when it resolves inside the root's own subtree;
//! anything else, including a reference to another root's subtree, is
//! reported. Cross-root validation is the document layer's concern and is
//! handled by mapping this check over every root.

use std::collections::HashSet;

use serde::Serialize;

use crate::document::Document;
use crate::mutate;
use crate::task::{DepRef, Task};

/// One unresolved dependency reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidDependency {
    /// Full identifier of the node declaring the reference (the root's own
    /// bare id when the root task itself declares it).
    pub node_id: String,
    pub invalid_ref: DepRef,
}

/// Validate every dependency list in `root`'s subtree, the root's own
/// included. Flattens once, builds the membership set of valid targets
/// (the root id, every subtask's full identifier, and every subtask's bare
/// sibling-local id), then reports each reference not in the set.
pub fn validate(root: &Task) -> Vec<InvalidDependency> {
    let mut ids: HashSet<u64> = HashSet::new();
    let mut paths: HashSet<String> = HashSet::new();

    ids.insert(root.id);
    let flat: Vec<_> = mutate::flatten(root).collect();
    for entry in &flat {
        ids.insert(entry.node.id);
        paths.insert(entry.full_id.clone());
    }

    let mut findings = Vec::new();

    let mut check = |node_id: String, deps: &[DepRef]| {
        for dep in deps {
            let resolved = match dep {
                DepRef::Id(id) => ids.contains(id),
                DepRef::Path(path) => paths.contains(path),
            };
            if !resolved {
                findings.push(InvalidDependency {
                    node_id: node_id.clone(),
                    invalid_ref: dep.clone(),
                });
            }
        }
    };

    check(root.id.to_string(), &root.dependencies);
    for entry in &flat {
        check(entry.full_id.clone(), &entry.node.dependencies);
    }

    findings
}

/// Map [`validate`] over every root task, aggregating findings in root
/// order.
pub fn validate_document(doc: &Document) -> Vec<InvalidDependency> {
    doc.tasks.iter().flat_map(validate).collect()
}
