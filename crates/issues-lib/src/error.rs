//! Error types for `issues-lib`.
//!
//! Three families mirror the wire contract: validation errors
//! (missing or empty required input), not-found errors (project or
//! issue absent), and storage errors (I/O, parse, serialization).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for issues-lib operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// One or more of the required creation fields is missing or empty.
    #[error("required field(s) missing")]
    RequiredFieldsMissing,

    /// An update or delete request arrived without an issue id.
    #[error("missing _id")]
    MissingId,

    /// An update request named an issue but carried no fields to apply.
    #[error("no update field(s) sent for {id}")]
    NoUpdateFields { id: String },

    // === Not-Found Errors ===
    /// No project with the given name exists.
    #[error("Project {name} does not exist")]
    ProjectNotFound { name: String },

    /// No issue with the given id exists in the named project.
    #[error("issue {id} not found in project {project}")]
    IssueNotFound { project: String, id: String },

    // === Storage Errors ===
    /// Failed to parse a line in the JSONL file.
    #[error("JSONL parse error at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    /// File not found at the specified path.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Generic storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the storage layer rather than the
    /// request itself. Storage failures surface as server errors; the
    /// rest stay inside the 200-status JSON contract.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::JsonlParse { .. }
                | Self::FileNotFound(_)
                | Self::Storage(_)
                | Self::Io(_)
                | Self::Json(_)
        )
    }
}

/// Result type using `Error`.
pub type Result<T> = std::result::Result<T, Error>;
