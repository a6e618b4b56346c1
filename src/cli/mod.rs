//! Command-line interface for tt
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::id::SubtaskId;
use crate::store::Store;

mod backup;
mod deps;
mod init;
mod migrate;
mod subtask;

/// tt - Task Tree
///
/// A CLI for hierarchical task management: path-addressed subtasks of
/// unlimited depth, dependency validation, and safe document migration.
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(long, global = true, env = "TT_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize tt in a directory
    Init {
        /// Project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Add a root task, or a subtask under a task or subtask
    Add {
        /// Parent to add under: a root task id (3) or a subtask id (3.1).
        /// Omitted: create a new root task.
        #[arg(long)]
        parent: Option<String>,

        /// Title of the new subtask
        #[arg(long)]
        title: String,

        /// Description text
        #[arg(long)]
        description: Option<String>,

        /// Status: pending, in-progress, done, deferred, cancelled, review
        #[arg(long)]
        status: Option<String>,

        /// Priority: high, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// Dependency reference (repeatable): a root id or a subtask id
        #[arg(long = "dep")]
        deps: Vec<String>,

        /// Implementation notes
        #[arg(long)]
        details: Option<String>,

        /// Test strategy notes
        #[arg(long)]
        test_strategy: Option<String>,
    },

    /// Remove a task or subtask and its entire subtree
    Remove {
        /// Target: a root task id (3) or a subtask id (3.1)
        id: String,
    },

    /// Update fields of a task or subtask
    Set {
        /// Target: a root task id (3) or a subtask id (3.1)
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Status: pending, in-progress, done, deferred, cancelled, review
        #[arg(long)]
        status: Option<String>,

        /// Priority: high, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// Replace the dependency list (repeatable)
        #[arg(long = "dep")]
        deps: Vec<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        test_strategy: Option<String>,
    },

    /// Show a task or subtask with its subtree
    Show {
        /// Target: a root task id (3) or a subtask id (3.1)
        id: String,
    },

    /// List root tasks, or the flattened subtree of one root
    List {
        /// Root task id to flatten
        root: Option<u64>,
    },

    /// Report unresolved dependency references
    Validate {
        /// Limit validation to one root task
        root: Option<u64>,
    },

    /// Convert a root task into a subtask of another root task
    Demote {
        /// Root task to demote
        task: u64,

        /// Root task that becomes the parent
        #[arg(long)]
        into: u64,
    },

    /// Migrate a pre-nesting document to the current schema
    Migrate,

    /// Backup management
    #[command(subcommand)]
    Backup(BackupCommands),
}

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Snapshot the task document and configuration
    Create,

    /// List existing backups, newest first
    List,

    /// Copy a backup back over the live document
    Restore {
        /// Backup label, id, or unique id prefix
        id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let json = self.json;
        let quiet = self.quiet;
        let dir = self.dir;

        match self.command {
            Commands::Init { name } => init::run(dir, name, json, quiet),
            Commands::Add {
                parent,
                title,
                description,
                status,
                priority,
                deps,
                details,
                test_strategy,
            } => subtask::add(subtask::AddOptions {
                parent,
                title,
                description,
                status,
                priority,
                deps,
                details,
                test_strategy,
                dir,
                json,
                quiet,
            }),
            Commands::Remove { id } => subtask::remove(subtask::RemoveOptions {
                id,
                dir,
                json,
                quiet,
            }),
            Commands::Set {
                id,
                title,
                description,
                status,
                priority,
                deps,
                details,
                test_strategy,
            } => subtask::set(subtask::SetOptions {
                id,
                title,
                description,
                status,
                priority,
                deps,
                details,
                test_strategy,
                dir,
                json,
                quiet,
            }),
            Commands::Show { id } => subtask::show(subtask::ShowOptions {
                id,
                dir,
                json,
                quiet,
            }),
            Commands::List { root } => subtask::list(subtask::ListOptions {
                root,
                dir,
                json,
                quiet,
            }),
            Commands::Validate { root } => deps::run(deps::ValidateOptions {
                root,
                dir,
                json,
                quiet,
            }),
            Commands::Demote { task, into } => subtask::demote(subtask::DemoteOptions {
                task,
                into,
                dir,
                json,
                quiet,
            }),
            Commands::Migrate => migrate::run(migrate::MigrateOptions { dir, json, quiet }),
            Commands::Backup(command) => match command {
                BackupCommands::Create => backup::create(backup::CreateOptions {
                    dir,
                    json,
                    quiet,
                }),
                BackupCommands::List => backup::list(backup::ListOptions { dir, json, quiet }),
                BackupCommands::Restore { id } => backup::restore(backup::RestoreOptions {
                    id,
                    dir,
                    json,
                    quiet,
                }),
            },
        }
    }
}

/// Open the store for the given (or current) directory.
pub(crate) fn open_store(dir: Option<PathBuf>) -> Result<Store> {
    let start = match dir {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Store::discover(&start)
}

/// Parse a CLI target: a bare root id yields an empty path, anything else
/// must be a well-formed subtask identifier.
pub(crate) fn parse_locator(value: &str) -> Result<(u64, Vec<u64>)> {
    let trimmed = value.trim();
    if !trimmed.contains('.') {
        let root: u64 = trimmed
            .parse()
            .map_err(|_| Error::MalformedIdentifier(trimmed.to_string()))?;
        if root == 0 {
            return Err(Error::MalformedIdentifier(trimmed.to_string()));
        }
        return Ok((root, Vec::new()));
    }
    Ok(SubtaskId::parse(trimmed)?.into_parts())
}
