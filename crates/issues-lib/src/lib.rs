//! `issues-lib`: in-process project/issue tracking library.
//!
//! Provides a standalone document store for issue records grouped
//! under named projects. Data is stored in memory and persisted via
//! JSONL files (one Project document per line, issues embedded).
//!
//! # Quick Start
//!
//! ```no_run
//! use issues_lib::{InMemoryStore, IssueFilters, IssueUpdate, NewIssue};
//!
//! // Load an existing file, or start empty if it doesn't exist yet
//! let mut store = InMemoryStore::open_or_create("path/to/projects.jsonl").unwrap();
//!
//! // Create; the project is upserted on first write
//! let issue = store.create_issue("apitest", &NewIssue {
//!     issue_title: "Fix login".into(),
//!     issue_text: "Login fails on retry".into(),
//!     created_by: "alice".into(),
//!     ..Default::default()
//! }).unwrap();
//!
//! // Query
//! let open = store.list_issues("apitest", &IssueFilters {
//!     open: Some(true),
//!     ..Default::default()
//! }).unwrap();
//!
//! // Update (partial merge)
//! store.update_issue("apitest", &issue.id, &IssueUpdate {
//!     assigned_to: Some("bob".into()),
//!     ..Default::default()
//! }).unwrap();
//!
//! // Persist back
//! store.flush().unwrap();
//! ```

pub mod error;
pub mod jsonl;
pub mod model;
pub mod query;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use model::{Issue, Project};
pub use query::{IssueFilters, IssueUpdate, NewIssue};
pub use store::InMemoryStore;
