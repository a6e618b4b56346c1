//! tt task/subtask command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{open_store, parse_locator};
use crate::error::{Error, Result};
use crate::id::SubtaskId;
use crate::mutate;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{DepRef, Priority, Status, Task, TaskDraft, TaskPatch};
use crate::tree;

pub struct AddOptions {
    pub parent: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deps: Vec<String>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RemoveOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deps: Vec<String>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub root: Option<u64>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DemoteOptions {
    pub task: u64,
    pub into: u64,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddReport {
    full_id: String,
    task: Task,
}

pub fn add(options: AddOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let mut doc = store.load()?;

    let draft = TaskDraft {
        title: options.title,
        description: options.description,
        status: options.status.as_deref().map(parse_status).transpose()?,
        priority: options.priority.as_deref().map(parse_priority).transpose()?,
        dependencies: parse_deps(&options.deps)?,
        details: options.details,
        test_strategy: options.test_strategy,
    };

    let (full_id, task) = match options.parent {
        None => {
            if draft.title.trim().is_empty() {
                return Err(Error::InvalidArgument(
                    "task title cannot be empty".to_string(),
                ));
            }
            let id = doc.next_task_id();
            let task = Task::from_draft(id, draft);
            doc.push_task(task.clone())?;
            (id.to_string(), task)
        }
        Some(parent) => {
            let (root_id, path) = parse_locator(&parent)?;
            let root = doc
                .find_task_mut(root_id)
                .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;
            let inserted = mutate::insert(root, &path, draft)?;
            (inserted.full_id.clone(), inserted.node.clone())
        }
    };

    store.save(&doc)?;

    let mut human = HumanOutput::new(format!("tt add: created {full_id}"));
    human.push_summary("id", full_id.clone());
    human.push_summary("title", task.title.clone());
    human.push_summary("status", task.status.as_str());
    human.push_next_step(format!("tt show {full_id}"));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &AddReport { full_id, task },
        Some(&human),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveReport {
    id: String,
    title: String,
    /// Subtasks discarded along with the removed node.
    descendants: usize,
}

pub fn remove(options: RemoveOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let mut doc = store.load()?;

    let (root_id, path) = parse_locator(&options.id)?;
    let removed = if path.is_empty() {
        doc.take_task(root_id)
            .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?
    } else {
        let root = doc
            .find_task_mut(root_id)
            .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;
        mutate::remove(root, &path)?
    };

    store.save(&doc)?;

    let descendants = mutate::flatten(&removed).count();
    let report = RemoveReport {
        id: options.id.clone(),
        title: removed.title,
        descendants,
    };

    let mut human = HumanOutput::new(format!("tt remove: removed {}", options.id));
    human.push_summary("title", report.title.clone());
    human.push_summary("discarded subtasks", descendants.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "remove",
        &report,
        Some(&human),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetReport {
    id: String,
    task: Task,
}

pub fn set(options: SetOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let mut doc = store.load()?;

    let patch = TaskPatch {
        title: options.title,
        description: options.description,
        status: options.status.as_deref().map(parse_status).transpose()?,
        priority: options.priority.as_deref().map(parse_priority).transpose()?,
        dependencies: if options.deps.is_empty() {
            None
        } else {
            Some(parse_deps(&options.deps)?)
        },
        details: options.details,
        test_strategy: options.test_strategy,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass at least one field flag".to_string(),
        ));
    }

    let (root_id, path) = parse_locator(&options.id)?;
    let root = doc
        .find_task_mut(root_id)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;
    let task = mutate::update(root, &path, &patch)?.clone();

    store.save(&doc)?;

    let mut human = HumanOutput::new(format!("tt set: updated {}", options.id));
    human.push_summary("title", task.title.clone());
    human.push_summary("status", task.status.as_str());
    human.push_summary("priority", task.priority.as_str());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "set",
        &SetReport {
            id: options.id,
            task,
        },
        Some(&human),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowReport {
    id: String,
    task: Task,
    subtree_size: usize,
}

pub fn show(options: ShowOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let doc = store.load()?;

    let (root_id, path) = parse_locator(&options.id)?;
    let root = doc
        .find_task(root_id)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;
    let task = tree::find_node(root, &path)
        .ok_or_else(|| Error::NodeNotFound(options.id.clone()))?
        .clone();

    let subtree_size = mutate::flatten(&task).count();

    let mut human = HumanOutput::new(format!("{}: {}", options.id, task.title));
    human.push_summary("status", task.status.as_str());
    human.push_summary("priority", task.priority.as_str());
    if !task.description.is_empty() {
        human.push_summary("description", task.description.clone());
    }
    if !task.dependencies.is_empty() {
        let deps: Vec<String> = task.dependencies.iter().map(|d| d.to_string()).collect();
        human.push_summary("depends on", deps.join(", "));
    }
    human.push_summary("subtasks in subtree", subtree_size.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &ShowReport {
            id: options.id,
            task,
            subtree_size,
        },
        Some(&human),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RootRow {
    id: u64,
    title: String,
    status: &'static str,
    priority: &'static str,
    subtasks: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatRow {
    full_id: String,
    depth: usize,
    title: String,
    status: &'static str,
}

pub fn list(options: ListOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let doc = store.load()?;

    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };

    match options.root {
        None => {
            let rows: Vec<RootRow> = doc
                .tasks
                .iter()
                .map(|task| RootRow {
                    id: task.id,
                    title: task.title.clone(),
                    status: task.status.as_str(),
                    priority: task.priority.as_str(),
                    subtasks: mutate::flatten(task).count(),
                })
                .collect();

            let mut human = HumanOutput::new(format!(
                "tt list: {} root task(s) in {}",
                rows.len(),
                doc.meta.project_name
            ));
            for row in &rows {
                human.push_detail(format!(
                    "{} [{}] {} ({} subtask(s))",
                    row.id, row.status, row.title, row.subtasks
                ));
            }

            emit_success(output, "list", &rows, Some(&human))
        }
        Some(root_id) => {
            let root = doc
                .find_task(root_id)
                .ok_or_else(|| Error::InvalidArgument(format!("task not found: {root_id}")))?;

            let rows: Vec<FlatRow> = mutate::flatten(root)
                .map(|entry| FlatRow {
                    full_id: entry.full_id,
                    depth: entry.depth,
                    title: entry.node.title.clone(),
                    status: entry.node.status.as_str(),
                })
                .collect();

            let mut human =
                HumanOutput::new(format!("tt list: task {root_id} \"{}\"", root.title));
            for row in &rows {
                human.push_detail(format!(
                    "{}{} [{}] {}",
                    "  ".repeat(row.depth - 1),
                    row.full_id,
                    row.status,
                    row.title
                ));
            }

            emit_success(output, "list", &rows, Some(&human))
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoteReport {
    task: u64,
    into: u64,
    full_id: String,
}

pub fn demote(options: DemoteOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let mut doc = store.load()?;

    let full_id = mutate::demote(&mut doc, options.task, options.into)?;
    store.save(&doc)?;

    let mut human = HumanOutput::new(format!(
        "tt demote: task {} is now subtask {full_id}",
        options.task
    ));
    human.push_summary("parent", options.into.to_string());
    human.push_next_step(format!("tt show {full_id}"));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "demote",
        &DemoteReport {
            task: options.task,
            into: options.into,
            full_id,
        },
        Some(&human),
    )
}

pub(crate) fn parse_status(value: &str) -> Result<Status> {
    match value.trim() {
        "pending" => Ok(Status::Pending),
        "in-progress" => Ok(Status::InProgress),
        "done" => Ok(Status::Done),
        "deferred" => Ok(Status::Deferred),
        "cancelled" => Ok(Status::Cancelled),
        "review" => Ok(Status::Review),
        other => Err(Error::InvalidArgument(format!(
            "unknown status '{other}' (expected pending, in-progress, done, deferred, cancelled, review)"
        ))),
    }
}

pub(crate) fn parse_priority(value: &str) -> Result<Priority> {
    match value.trim() {
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        other => Err(Error::InvalidArgument(format!(
            "unknown priority '{other}' (expected high, medium, low)"
        ))),
    }
}

pub(crate) fn parse_deps(values: &[String]) -> Result<Vec<DepRef>> {
    let mut deps = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if !trimmed.contains('.') {
            let id: u64 = trimmed
                .parse()
                .map_err(|_| Error::MalformedIdentifier(trimmed.to_string()))?;
            if id == 0 {
                return Err(Error::MalformedIdentifier(trimmed.to_string()));
            }
            deps.push(DepRef::Id(id));
        } else {
            let id = SubtaskId::parse(trimmed)?;
            deps.push(DepRef::Path(id.to_string()));
        }
    }
    Ok(deps)
}
