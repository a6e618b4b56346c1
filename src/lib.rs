//! tt - Task Tree Library
//!
//! This library provides the core functionality for the tt CLI tool: a
//! persistent, arbitrarily-deep hierarchy of tasks and subtasks addressed
//! by dot-separated path identifiers.
//!
//! # Core Concepts
//!
//! - **Hierarchical Identifiers**: `1.2.3` = root task 1, subtask 2, its
//!   subtask 3; root ids are document-unique, subtask ids sibling-local
//! - **Path Navigation**: all lookups walk root-down, no parent pointers
//! - **Dependency Validation**: every declared reference must resolve
//!   within its root's subtree
//! - **Legacy Migration**: flat pre-nesting documents are upgraded in
//!   place, behind a mandatory backup
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tt.toml`
//! - `error`: Error types and result aliases
//! - `id`: Hierarchical identifier codec
//! - `task`: Recursive task node, drafts, and patches
//! - `document`: Persisted document and metadata
//! - `tree`: Path-based navigation
//! - `mutate`: Insert/remove/update/flatten/demote operations
//! - `deps`: Dependency validation
//! - `migrate`: Legacy-shape detection and the migration driver
//! - `backup`: Pre-migration snapshots and restore
//! - `store`: File storage and atomic document persistence
//! - `output`: CLI output envelopes

pub mod backup;
pub mod cli;
pub mod config;
pub mod deps;
pub mod document;
pub mod error;
pub mod id;
pub mod migrate;
pub mod mutate;
pub mod output;
pub mod store;
pub mod task;
pub mod tree;

pub use error::{Error, Result};
