//! End-to-end tree operations over an in-memory document.

use tt::document::Document;
use tt::error::Error;
use tt::mutate::{demote, flatten, insert, remove, update};
use tt::task::{DepRef, Priority, Status, Task, TaskDraft, TaskPatch};
use tt::tree::find_node;

fn draft(title: &str) -> TaskDraft {
    TaskDraft::titled(title)
}

/// Root task 1 with subtask 1 ("Level 1") containing subtask 1 ("Level 2"),
/// and subtask 2 ("Level 1 sibling").
fn nested_root() -> Task {
    let mut root = Task::from_draft(1, draft("root"));
    insert(&mut root, &[], draft("Level 1")).unwrap();
    insert(&mut root, &[1], draft("Level 2")).unwrap();
    insert(&mut root, &[], draft("Level 1 sibling")).unwrap();
    root
}

#[test]
fn inserted_node_is_findable_with_given_fields() {
    let mut root = Task::from_draft(2, draft("root"));
    let inserted = insert(
        &mut root,
        &[],
        TaskDraft {
            title: "build codec".to_string(),
            description: Some("parse and render ids".to_string()),
            priority: Some(Priority::High),
            ..TaskDraft::default()
        },
    )
    .unwrap();
    let path: Vec<u64> = vec![1];
    assert_eq!(inserted.full_id, "2.1");

    let node = find_node(&root, &path).expect("inserted node resolves");
    assert_eq!(node.title, "build codec");
    assert_eq!(node.description, "parse and render ids");
    assert_eq!(node.status, Status::Pending);
    assert_eq!(node.priority, Priority::High);
}

#[test]
fn insert_under_level_one_yields_expected_id_and_count() {
    let mut root = nested_root();

    let inserted = insert(&mut root, &[1], draft("another level 2")).unwrap();
    assert_eq!(inserted.full_id, "1.1.2");
    assert_eq!(find_node(&root, &[1]).unwrap().children().len(), 2);
}

#[test]
fn remove_then_find_is_gone_and_sibling_count_drops() {
    let mut root = nested_root();
    let before = root.children().len();

    remove(&mut root, &[2]).unwrap();

    assert!(find_node(&root, &[2]).is_none());
    assert_eq!(root.children().len(), before - 1);
}

#[test]
fn update_cannot_change_id_or_children_via_patch_json() {
    let mut root = nested_root();

    // A caller-supplied patch that tries to smuggle id/subtasks changes.
    let patch: TaskPatch = serde_json::from_str(
        r#"{"id": 42, "subtasks": [], "title": "renamed", "status": "review"}"#,
    )
    .unwrap();

    let node = update(&mut root, &[1], &patch).unwrap();
    assert_eq!(node.id, 1);
    assert_eq!(node.title, "renamed");
    assert_eq!(node.status, Status::Review);
    assert_eq!(node.children().len(), 1);
}

#[test]
fn flatten_emits_preorder_with_full_ids_and_depths() {
    let root = nested_root();

    let entries: Vec<(String, usize)> = flatten(&root)
        .map(|entry| (entry.full_id, entry.depth))
        .collect();

    assert_eq!(
        entries,
        vec![
            ("1.1".to_string(), 1),
            ("1.1.1".to_string(), 2),
            ("1.2".to_string(), 1),
        ]
    );
}

#[test]
fn demote_with_declared_dependency_fails_with_circular_reference() {
    let mut doc = Document::new("demo");
    let mut three = Task::from_draft(3, draft("three"));
    three.dependencies.push(DepRef::Id(5));
    doc.push_task(three).unwrap();
    doc.push_task(Task::from_draft(5, draft("five"))).unwrap();

    let err = demote(&mut doc, 5, 3).unwrap_err();
    assert!(matches!(
        err,
        Error::CircularReference { task: 5, parent: 3 }
    ));

    // Nothing moved.
    assert!(doc.find_task(5).is_some());
    assert!(doc.find_task(3).unwrap().children().is_empty());
}

#[test]
fn demote_keeps_subtree_and_assigns_next_sibling_id() {
    let mut doc = Document::new("demo");
    doc.push_task(Task::from_draft(3, draft("parent"))).unwrap();
    let mut five = Task::from_draft(5, draft("moved"));
    insert(&mut five, &[], draft("carried child")).unwrap();
    doc.push_task(five).unwrap();

    let parent = doc.find_task_mut(3).unwrap();
    insert(parent, &[], draft("existing child")).unwrap();

    let full_id = demote(&mut doc, 5, 3).unwrap();
    assert_eq!(full_id, "3.2");

    let parent = doc.find_task(3).unwrap();
    let moved = find_node(parent, &[2]).unwrap();
    assert_eq!(moved.title, "moved");
    assert_eq!(moved.children().len(), 1);
    assert_eq!(moved.children()[0].title, "carried child");
}
