//! Error types for tt
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, malformed ids, missing nodes)
//! - 3: Blocked by structural guard (self/circular reference)
//! - 4: Operation failed (I/O, serialization, migration, backup)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const STRUCTURE_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tt operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Not a tt project (no .tt directory found from {0})")]
    NotInitialized(PathBuf),

    #[error("Malformed identifier '{0}': expected dot-separated positive integers with at least two segments")]
    MalformedIdentifier(String),

    #[error("A subtask identifier requires at least one path segment")]
    EmptyPath,

    #[error("Container not found for path {0}")]
    ContainerNotFound(String),

    #[error("No subtask at {0}")]
    NodeNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Structural guards (exit code 3)
    #[error("Task {0} cannot become a subtask of itself")]
    SelfReference(u64),

    #[error("Task {parent} depends on task {task}; demoting {task} under it would create a cycle")]
    CircularReference { task: u64, parent: u64 },

    // Operation failures (exit code 4)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Migration step '{step}' failed: {cause}")]
    MigrationStepFailed { step: String, cause: String },

    #[error("Backup failed: {0}")]
    BackupFailed(String),

    #[error("Restore failed: {0}")]
    RestoreFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::NotInitialized(_)
            | Error::MalformedIdentifier(_)
            | Error::EmptyPath
            | Error::ContainerNotFound(_)
            | Error::NodeNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // Structural guards
            Error::SelfReference(_) | Error::CircularReference { .. } => {
                exit_codes::STRUCTURE_BLOCKED
            }

            // Operation failures
            Error::InvalidDocument(_)
            | Error::MigrationStepFailed { .. }
            | Error::BackupFailed(_)
            | Error::RestoreFailed(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable kind name, used in JSON error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotInitialized(_) => "not_initialized",
            Error::MalformedIdentifier(_) => "malformed_identifier",
            Error::EmptyPath => "empty_path",
            Error::ContainerNotFound(_) => "container_not_found",
            Error::NodeNotFound(_) => "node_not_found",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::SelfReference(_) => "self_reference",
            Error::CircularReference { .. } => "circular_reference",
            Error::InvalidDocument(_) => "invalid_document",
            Error::MigrationStepFailed { .. } => "migration_step_failed",
            Error::BackupFailed(_) => "backup_failed",
            Error::RestoreFailed(_) => "restore_failed",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::TomlParse(_) | Error::TomlSerialize(_) => "toml",
            Error::OperationFailed(_) => "operation_failed",
        }
    }
}

/// Result type alias for tt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub kind: &'static str,
    pub code: i32,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            kind: err.kind(),
            code: err.exit_code(),
        }
    }
}
