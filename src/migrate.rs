//! Legacy document migration.
//!
//! Documents written before nested-subtask support carry subtasks without a
//! child-collection field. Per-node migration is shallow and idempotent:
//! it normalizes only the direct children of the node it is handed. The
//! document driver sweeps every root to full depth, takes a backup first,
//! collects per-step outcomes instead of aborting on the first failure,
//! and stamps the document metadata.

use serde::Serialize;

use crate::backup::{self, BackupHandle};
use crate::document::{FEATURE_NESTED_SUBTASKS, SCHEMA_VERSION};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::task::{SubtaskState, Task};

/// A task is legacy when its subtask collection is non-empty and at least
/// one direct child lacks a child-collection field entirely. A
/// migrated-but-childless task is not legacy.
pub fn is_legacy(task: &Task) -> bool {
    let children = task.children();
    !children.is_empty()
        && children
            .iter()
            .any(|child| child.subtask_state() == SubtaskState::Unmigrated)
}

/// Shallow, idempotent migration of one node: every direct child lacking a
/// child collection gets an explicitly empty one. Returns whether anything
/// changed; already-nested input is left untouched.
pub fn migrate_task(task: &mut Task) -> bool {
    let mut changed = false;
    if let Some(children) = task.subtasks.as_mut() {
        for child in children {
            if child.subtasks.is_none() {
                child.subtasks = Some(Vec::new());
                changed = true;
            }
        }
    }
    changed
}

/// True when any node in the subtree still lacks an explicit child
/// collection (the task itself included).
pub fn needs_migration(task: &Task) -> bool {
    task.subtasks.is_none() || task.children().iter().any(needs_migration)
}

/// Full-depth normalization of one root's subtree: migration applied at
/// every level, and the root's own collection made explicit. Duplicate
/// sibling ids are rejected rather than silently migrated.
fn normalize_subtree(task: &mut Task) -> Result<bool> {
    check_sibling_ids(task)?;

    let mut changed = false;
    if task.subtasks.is_none() {
        task.subtasks = Some(Vec::new());
        changed = true;
    }
    changed |= migrate_task(task);
    if let Some(children) = task.subtasks.as_mut() {
        for child in children {
            changed |= normalize_subtree(child)?;
        }
    }
    Ok(changed)
}

fn check_sibling_ids(task: &Task) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for child in task.children() {
        if !seen.insert(child.id) {
            return Err(Error::OperationFailed(format!(
                "duplicate sibling id {} under task {}",
                child.id, task.id
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Applied,
    Failed,
}

/// Outcome of one migration step (one root task).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of a document migration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub steps: Vec<StepResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupHandle>,
}

impl MigrationReport {
    pub fn applied(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Applied)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Failed)
            .count()
    }
}

/// Document-wide migration driver.
///
/// Loads the document, backs it up before touching anything (a backup
/// failure aborts the run with no mutation), then migrates each legacy
/// root as an independent step. A failing step is recorded and the
/// remaining steps still run. Metadata is stamped once at least one step
/// applied, and the document is saved with whatever subset succeeded.
pub fn run(store: &Store) -> Result<MigrationReport> {
    let mut doc = store.load()?;

    let pending: Vec<u64> = doc
        .tasks
        .iter()
        .filter(|task| needs_migration(task))
        .map(|task| task.id)
        .collect();

    if pending.is_empty() {
        tracing::debug!("document already in nested shape");
        return Ok(MigrationReport {
            steps: Vec::new(),
            backup: None,
        });
    }

    let handle = backup::create(store)?;

    let mut steps = Vec::new();
    for id in pending {
        let step = format!("task {id}");
        let Some(task) = doc.find_task_mut(id) else {
            continue;
        };
        match normalize_subtree(task) {
            Ok(_) => {
                tracing::debug!(step = %step, "migration step applied");
                steps.push(StepResult {
                    step,
                    status: StepStatus::Applied,
                    error: None,
                });
            }
            Err(cause) => {
                let err = Error::MigrationStepFailed {
                    step: step.clone(),
                    cause: cause.to_string(),
                };
                tracing::debug!(step = %step, error = %err, "migration step failed");
                steps.push(StepResult {
                    step,
                    status: StepStatus::Failed,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    let report = MigrationReport {
        steps,
        backup: Some(handle),
    };

    if report.applied() > 0 {
        doc.meta.nested_subtasks_support = true;
        doc.meta.schema_version = SCHEMA_VERSION;
        doc.meta.version = env!("CARGO_PKG_VERSION").to_string();
        doc.meta.last_migration = Some(chrono::Utc::now());
        if !doc
            .meta
            .features
            .iter()
            .any(|feature| feature == FEATURE_NESTED_SUBTASKS)
        {
            doc.meta.features.push(FEATURE_NESTED_SUBTASKS.to_string());
        }
    }

    store.save(&doc)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;

    fn legacy_child(id: u64) -> Task {
        let mut child = Task::from_draft(id, TaskDraft::titled(format!("legacy {id}")));
        child.subtasks = None;
        child
    }

    fn legacy_task(id: u64) -> Task {
        let mut task = Task::from_draft(id, TaskDraft::titled(format!("task {id}")));
        task.children_mut().push(legacy_child(1));
        task.children_mut().push(legacy_child(2));
        task
    }

    #[test]
    fn legacy_detection_distinguishes_childless() {
        assert!(is_legacy(&legacy_task(1)));

        // Migrated but childless: not legacy.
        let empty = Task::from_draft(1, TaskDraft::titled("empty"));
        assert!(!is_legacy(&empty));

        // All children carry explicit collections: not legacy.
        let mut nested = Task::from_draft(1, TaskDraft::titled("nested"));
        nested
            .children_mut()
            .push(Task::from_draft(1, TaskDraft::titled("child")));
        assert!(!is_legacy(&nested));
    }

    #[test]
    fn migrate_task_is_shallow() {
        let mut task = legacy_task(1);
        let mut grandchild_owner = legacy_child(3);
        grandchild_owner.subtasks = Some(vec![legacy_child(1)]);
        task.children_mut().push(grandchild_owner);

        assert!(migrate_task(&mut task));
        assert!(task
            .children()
            .iter()
            .all(|child| child.subtasks.is_some()));
        // Grandchildren are untouched by a single shallow invocation.
        assert!(task.children()[2].children()[0].subtasks.is_none());
    }

    #[test]
    fn migrate_task_is_idempotent() {
        let mut task = legacy_task(1);
        assert!(migrate_task(&mut task));
        let snapshot = serde_json::to_string(&task).unwrap();

        assert!(!migrate_task(&mut task));
        assert_eq!(serde_json::to_string(&task).unwrap(), snapshot);
    }

    #[test]
    fn normalize_subtree_reaches_full_depth() {
        let mut task = legacy_task(1);
        let mut deep = legacy_child(3);
        deep.subtasks = Some(vec![legacy_child(1)]);
        task.children_mut().push(deep);

        assert!(normalize_subtree(&mut task).unwrap());
        assert!(!needs_migration(&task));
        assert!(!normalize_subtree(&mut task).unwrap());
    }

    #[test]
    fn normalize_subtree_rejects_duplicate_sibling_ids() {
        let mut task = Task::from_draft(1, TaskDraft::titled("task"));
        task.children_mut().push(legacy_child(1));
        task.children_mut().push(legacy_child(1));

        assert!(normalize_subtree(&mut task).is_err());
    }

    mod driver {
        use super::*;
        use crate::document::Document;
        use crate::store::Store;
        use tempfile::TempDir;

        fn store_with(doc: &Document) -> (TempDir, Store) {
            let temp = TempDir::new().unwrap();
            let store = Store::open(temp.path().to_path_buf());
            store.init("demo").unwrap();
            store.save(doc).unwrap();
            (temp, store)
        }

        #[test]
        fn no_op_on_nested_document_takes_no_backup() {
            let mut doc = Document::new("demo");
            doc.push_task(Task::from_draft(1, TaskDraft::titled("a")))
                .unwrap();
            let (_temp, store) = store_with(&doc);

            let report = run(&store).unwrap();
            assert!(report.steps.is_empty());
            assert!(report.backup.is_none());
            assert!(backup::list(&store).unwrap().is_empty());
        }

        #[test]
        fn legacy_document_is_migrated_and_stamped() {
            let mut doc = Document::new("demo");
            doc.meta.nested_subtasks_support = false;
            doc.meta.schema_version = 1;
            doc.meta.features.clear();
            doc.push_task(legacy_task(1)).unwrap();
            doc.push_task(Task::from_draft(2, TaskDraft::titled("fine")))
                .unwrap();
            let (_temp, store) = store_with(&doc);

            let report = run(&store).unwrap();
            assert_eq!(report.applied(), 1);
            assert_eq!(report.failed(), 0);
            assert!(report.backup.is_some());

            let migrated = store.load().unwrap();
            assert!(migrated.meta.nested_subtasks_support);
            assert_eq!(migrated.meta.schema_version, SCHEMA_VERSION);
            assert!(migrated.meta.last_migration.is_some());
            assert!(migrated
                .meta
                .features
                .contains(&FEATURE_NESTED_SUBTASKS.to_string()));
            assert!(migrated.tasks.iter().all(|task| !needs_migration(task)));
        }

        #[test]
        fn failed_step_does_not_stop_the_others() {
            let mut doc = Document::new("demo");
            doc.meta.nested_subtasks_support = false;

            let mut broken = Task::from_draft(1, TaskDraft::titled("broken"));
            broken.children_mut().push(legacy_child(1));
            broken.children_mut().push(legacy_child(1));
            doc.push_task(broken).unwrap();
            doc.push_task(legacy_task(2)).unwrap();
            let (_temp, store) = store_with(&doc);

            let report = run(&store).unwrap();
            assert_eq!(report.failed(), 1);
            assert_eq!(report.applied(), 1);
            assert!(report.steps[0].error.as_deref().unwrap().contains("task 1"));

            // The healthy root was still migrated and saved.
            let saved = store.load().unwrap();
            assert!(!needs_migration(saved.find_task(2).unwrap()));
            assert!(needs_migration(saved.find_task(1).unwrap()));
        }

        #[test]
        fn driver_run_is_idempotent() {
            let mut doc = Document::new("demo");
            doc.push_task(legacy_task(1)).unwrap();
            let (_temp, store) = store_with(&doc);

            let first = run(&store).unwrap();
            assert_eq!(first.applied(), 1);
            let before = std::fs::read_to_string(store.tasks_file()).unwrap();

            let second = run(&store).unwrap();
            assert!(second.steps.is_empty());
            let after = std::fs::read_to_string(store.tasks_file()).unwrap();
            assert_eq!(before, after);
        }
    }
}
