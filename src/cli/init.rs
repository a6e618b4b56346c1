//! tt init command implementation
//!
//! Creates the `.tt/` directory, seeds an empty task document, and writes
//! a default `.tt.toml`.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::{self, Store};

#[derive(serde::Serialize)]
struct InitReport {
    project: PathBuf,
    created: InitCreated,
    updated: InitUpdated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    tt_dir: bool,
    document: bool,
}

#[derive(serde::Serialize)]
struct InitUpdated {
    gitignore: bool,
}

pub fn run(dir: Option<PathBuf>, name: Option<String>, json: bool, quiet: bool) -> Result<()> {
    let project_root = match dir {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let project_name = name.unwrap_or_else(|| {
        project_root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    });

    let store = Store::open(project_root.clone());
    let created_tt_dir = !store.is_initialized();
    let created_document = store.init(&project_name)?;
    let created_config = ensure_config(&store, &project_name)?;
    let updated_gitignore = store::ensure_gitignore(&project_root)?;

    let report = InitReport {
        project: project_root.clone(),
        created: InitCreated {
            config: created_config,
            tt_dir: created_tt_dir,
            document: created_document,
        },
        updated: InitUpdated {
            gitignore: updated_gitignore,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push(".tt.toml");
    }
    if created_tt_dir {
        created_items.push(".tt/");
    }
    if created_document {
        created_items.push(".tt/tasks.json");
    }

    let header = if created_items.is_empty() && !updated_gitignore {
        "tt init: nothing to do".to_string()
    } else {
        "tt init: initialized project".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("project", project_root.display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    if updated_gitignore {
        human.push_summary("updated", ".gitignore".to_string());
    }
    human.push_next_step("tt add --parent <id> --title <title>");
    human.push_next_step("tt list");

    emit_success(
        OutputOptions { json, quiet },
        "init",
        &report,
        Some(&human),
    )?;

    Ok(())
}

fn ensure_config(store: &Store, project_name: &str) -> Result<bool> {
    let config_path = store.config_file();
    if config_path.exists() {
        return Ok(false);
    }

    let config = Config {
        project_name: project_name.to_string(),
        ..Config::default()
    };
    config.save(&config_path)?;
    Ok(true)
}
