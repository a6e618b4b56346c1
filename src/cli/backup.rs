//! tt backup command implementations.

use std::path::PathBuf;

use crate::backup;
use crate::cli::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct CreateOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RestoreOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn create(options: CreateOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let handle = backup::create(&store)?;

    let mut human = HumanOutput::new(format!("tt backup: created {}", handle.label));
    human.push_summary("files", handle.files.join(", "));
    human.push_summary("location", handle.dir.display().to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "backup create",
        &handle,
        Some(&human),
    )
}

pub fn list(options: ListOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let handles = backup::list(&store)?;
    let config = Config::load_from_project(store.project_root());

    let mut human = HumanOutput::new(format!("tt backup: {} backup(s)", handles.len()));
    for handle in &handles {
        human.push_detail(format!(
            "{} ({} file(s), {})",
            handle.label,
            handle.files.len(),
            handle.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if config.backups.warn_after > 0 && handles.len() > config.backups.warn_after {
        human.push_warning(format!(
            "{} backups on disk; consider pruning old ones",
            handles.len()
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "backup list",
        &handles,
        Some(&human),
    )
}

pub fn restore(options: RestoreOptions) -> Result<()> {
    let store = open_store(options.dir)?;
    let handle = backup::find(&store, &options.id)?;
    let summary = backup::restore(&store, &handle)?;

    let mut human = HumanOutput::new(format!("tt backup: restored {}", summary.label));
    human.push_summary("files", summary.restored.join(", "));
    human.push_next_step("tt list".to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "backup restore",
        &summary,
        Some(&human),
    )
}
