//! Error types for taskpad
//!
//! Exit codes:
//! - 0: Success
//! - 2: Rejected input (validation failure, unknown task, bad config)
//! - 4: Operation failed (storage write, serialization, runtime)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskpad CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskpad operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation failures (exit code 2)
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("Unknown task state '{0}': expected completed or active")]
    InvalidState(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Whether this is a user-facing rejection rather than a system failure.
    ///
    /// Validation failures never leave the task collection modified.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyTitle
                | Error::InvalidDueDate(_)
                | Error::InvalidState(_)
                | Error::TaskNotFound(_)
                | Error::InvalidArgument(_)
        )
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyTitle
            | Error::InvalidDueDate(_)
            | Error::InvalidState(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::Storage { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            Error::TaskNotFound(_) => "not_found",
            Error::EmptyTitle
            | Error::InvalidDueDate(_)
            | Error::InvalidState(_)
            | Error::InvalidArgument(_) => "validation",
            Error::InvalidConfig(_) | Error::TomlParse(_) => "config",
            Error::Storage { .. } => "storage",
            Error::Io(_) | Error::Json(_) | Error::OperationFailed(_) => "operation_failed",
        }
    }

    /// Structured details for JSON error output, when the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::InvalidDueDate(value) => Some(serde_json::json!({ "due_date": value })),
            Error::InvalidState(value) => Some(serde_json::json!({ "state": value })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::Storage { path, .. } => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for taskpad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
