//! Core data types for issues-lib.
//!
//! Serde field names match the wire contract (`_id` on issues), so
//! the same structs serve both the JSONL file and the API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const fn default_open() -> bool {
    true
}

/// A trackable unit of work inside a project.
///
/// `id` and `created_on` are assigned at creation and never change.
/// `updated_on` is refreshed on every accepted update and is always
/// `>= created_on`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique ID within the owning project (e.g., "it-4k9znp").
    #[serde(rename = "_id")]
    pub id: String,

    /// Short summary. Required at creation.
    pub issue_title: String,

    /// Full description. Required at creation.
    pub issue_text: String,

    /// Creation timestamp.
    pub created_on: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_on: DateTime<Utc>,

    /// Reporter. Required at creation.
    pub created_by: String,

    /// Assignee. Defaults to empty.
    #[serde(default)]
    pub assigned_to: String,

    /// Whether the issue is still open.
    #[serde(default = "default_open")]
    pub open: bool,

    /// Free-form status note. Defaults to empty.
    #[serde(default)]
    pub status_text: String,
}

/// Named container for an ordered sequence of issues.
///
/// Projects are created implicitly by the first issue posted under a
/// new name and are never deleted through this API. Issue order is
/// insertion order and survives updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Unique project name (the path segment clients address it by).
    pub name: String,

    /// Embedded issue documents, oldest first.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Project {
    /// Create an empty project with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issues: Vec::new(),
        }
    }
}
