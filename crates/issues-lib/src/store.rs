//! In-memory project/issue store backed by `HashMap`.
//!
//! Plays the document-store role of the service: projects are
//! documents keyed by name, each embedding an ordered issue array.
//! Use `open_or_create()` to load from a JSONL file and `flush()` to
//! persist back. Updates and deletes address issues by id in place,
//! so issue order is stable across the whole lifecycle.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Issue, Project};
use crate::query::{IssueFilters, IssueUpdate, NewIssue};

/// In-memory issue store, one document per project.
pub struct InMemoryStore {
    projects: HashMap<String, Project>,
    dirty: HashSet<String>,
    jsonl_path: Option<PathBuf>,
    prefix: String,
}

impl InMemoryStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty, ephemeral store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: HashMap::new(),
            dirty: HashSet::new(),
            jsonl_path: None,
            prefix: "it".to_string(),
        }
    }

    /// Open and load from a JSONL file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded = crate::jsonl::load(path)?;

        let mut store = Self::new();
        store.jsonl_path = Some(path.to_path_buf());

        for project in loaded {
            store.projects.insert(project.name.clone(), project);
        }

        Ok(store)
    }

    /// Open an existing JSONL file, or start empty if it does not
    /// exist yet. Either way the store remembers the path for
    /// `flush()`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            let mut store = Self::new();
            store.jsonl_path = Some(path.to_path_buf());
            Ok(store)
        }
    }

    /// Set the ID prefix for new issues.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Get the ID prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Save to the file that was opened.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self
            .jsonl_path
            .as_ref()
            .ok_or_else(|| Error::Storage("no file path set; use save_to()".to_string()))?;
        self.save_to(path.clone())
    }

    /// Save to a specific file path.
    ///
    /// Projects are written sorted by name for deterministic output.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut projects: Vec<Project> = self.projects.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        crate::jsonl::save(path.as_ref(), &projects)
    }

    /// Persist pending changes, if any.
    ///
    /// No-op when nothing changed or when the store is ephemeral
    /// (no path), which is what the test suites use.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty.is_empty() || self.jsonl_path.is_none() {
            return Ok(());
        }
        self.save()?;
        debug!(projects = self.dirty.len(), "flushed store");
        self.dirty.clear();
        Ok(())
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create an issue under the named project, upserting the project.
    ///
    /// Assigns a fresh id unique within the project and stamps
    /// `created_on = updated_on = now`, `open = true`.
    ///
    /// # Errors
    ///
    /// Returns `RequiredFieldsMissing` if any of `issue_title`,
    /// `issue_text`, `created_by` is absent or empty.
    pub fn create_issue(&mut self, project_name: &str, draft: &NewIssue) -> Result<Issue> {
        if !draft.has_required_fields() {
            return Err(Error::RequiredFieldsMissing);
        }

        let project = self
            .projects
            .entry(project_name.to_string())
            .or_insert_with(|| Project::new(project_name));

        let now = Utc::now();
        let id = crate::util::generate_id(
            &self.prefix,
            &draft.issue_title,
            &draft.created_by,
            now,
            project.issues.len(),
            |candidate| project.issues.iter().any(|i| i.id == candidate),
        );

        let issue = Issue {
            id,
            issue_title: draft.issue_title.clone(),
            issue_text: draft.issue_text.clone(),
            created_on: now,
            updated_on: now,
            created_by: draft.created_by.clone(),
            assigned_to: draft.assigned_to.clone().unwrap_or_default(),
            open: true,
            status_text: draft.status_text.clone().unwrap_or_default(),
        };

        project.issues.push(issue.clone());
        self.dirty.insert(project_name.to_string());

        debug!(project = project_name, id = %issue.id, "created issue");
        Ok(issue)
    }

    /// List issues in the named project, applying all set filters
    /// conjunctively. No side effects.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist. Not an
    /// empty list, so the route can reproduce the documented error
    /// object.
    pub fn list_issues(&self, project_name: &str, filters: &IssueFilters) -> Result<Vec<&Issue>> {
        let project = self
            .projects
            .get(project_name)
            .ok_or_else(|| Error::ProjectNotFound {
                name: project_name.to_string(),
            })?;

        Ok(project
            .issues
            .iter()
            .filter(|issue| filters.matches(issue))
            .collect())
    }

    /// Merge an update into one issue, addressed by id.
    ///
    /// Text fields overwrite only when present and non-empty; `open`
    /// applies whenever present. `updated_on` moves strictly forward
    /// on every accepted update. The issue keeps its position in the
    /// project's sequence.
    ///
    /// # Errors
    ///
    /// Returns `NoUpdateFields` if nothing would be applied, or
    /// `IssueNotFound` if the project or issue is absent.
    pub fn update_issue(
        &mut self,
        project_name: &str,
        id: &str,
        update: &IssueUpdate,
    ) -> Result<Issue> {
        if update.is_empty() {
            return Err(Error::NoUpdateFields { id: id.to_string() });
        }

        let issue = self.find_issue_mut(project_name, id)?;

        let apply = |target: &mut String, source: Option<&String>| {
            if let Some(value) = source {
                if !value.is_empty() {
                    target.clone_from(value);
                }
            }
        };
        apply(&mut issue.issue_title, update.issue_title.as_ref());
        apply(&mut issue.issue_text, update.issue_text.as_ref());
        apply(&mut issue.created_by, update.created_by.as_ref());
        apply(&mut issue.assigned_to, update.assigned_to.as_ref());
        apply(&mut issue.status_text, update.status_text.as_ref());
        if let Some(open) = update.open {
            issue.open = open;
        }

        // updated_on strictly increases even on same-instant clocks
        let mut now = Utc::now();
        if now <= issue.updated_on {
            now = issue.updated_on + Duration::nanoseconds(1);
        }
        issue.updated_on = now;

        let updated = issue.clone();
        self.dirty.insert(project_name.to_string());

        debug!(project = project_name, id, "updated issue");
        Ok(updated)
    }

    /// Remove one issue from the named project's sequence.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the project or issue is absent, so a
    /// repeated delete of the same id fails the second time.
    pub fn delete_issue(&mut self, project_name: &str, id: &str) -> Result<()> {
        let project = self
            .projects
            .get_mut(project_name)
            .ok_or_else(|| Error::IssueNotFound {
                project: project_name.to_string(),
                id: id.to_string(),
            })?;

        let pos = project
            .issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or_else(|| Error::IssueNotFound {
                project: project_name.to_string(),
                id: id.to_string(),
            })?;

        project.issues.remove(pos);
        self.dirty.insert(project_name.to_string());

        debug!(project = project_name, id, "deleted issue");
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get a single issue by project and id.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the project or issue is absent.
    pub fn get_issue(&self, project_name: &str, id: &str) -> Result<&Issue> {
        self.projects
            .get(project_name)
            .and_then(|p| p.issues.iter().find(|issue| issue.id == id))
            .ok_or_else(|| Error::IssueNotFound {
                project: project_name.to_string(),
                id: id.to_string(),
            })
    }

    /// Get a project document by name.
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// All project names.
    #[must_use]
    pub fn project_names(&self) -> Vec<&str> {
        self.projects.keys().map(String::as_str).collect()
    }

    // ========================================================================
    // Dirty Tracking
    // ========================================================================

    /// Check if any projects have unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Clear dirty tracking flags without saving.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Total number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Check if the store holds no projects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn find_issue_mut(&mut self, project_name: &str, id: &str) -> Result<&mut Issue> {
        self.projects
            .get_mut(project_name)
            .and_then(|p| p.issues.iter_mut().find(|issue| issue.id == id))
            .ok_or_else(|| Error::IssueNotFound {
                project: project_name.to_string(),
                id: id.to_string(),
            })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_draft(title: &str, creator: &str) -> NewIssue {
        NewIssue {
            issue_title: title.to_string(),
            issue_text: format!("{title} body"),
            created_by: creator.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_id_and_defaults() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("First", "alice"))
            .unwrap();

        assert!(issue.id.starts_with("it-"));
        assert!(issue.open);
        assert!(issue.assigned_to.is_empty());
        assert!(issue.status_text.is_empty());
        assert_eq!(issue.created_on, issue.updated_on);
    }

    #[test]
    fn test_create_upserts_project() {
        let mut store = InMemoryStore::new();
        assert!(store.get_project("fresh").is_none());

        store
            .create_issue("fresh", &make_draft("First", "alice"))
            .unwrap();
        assert_eq!(store.get_project("fresh").unwrap().issues.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_missing_required_rejected() {
        let mut store = InMemoryStore::new();
        let draft = NewIssue {
            issue_title: "T".to_string(),
            // issue_text empty
            created_by: "alice".to_string(),
            ..Default::default()
        };
        let result = store.create_issue("apitest", &draft);
        assert!(matches!(result, Err(Error::RequiredFieldsMissing)));
        // Nothing persisted, not even the project
        assert!(store.get_project("apitest").is_none());
    }

    #[test]
    fn test_ids_unique_within_project() {
        let mut store = InMemoryStore::new();
        let a = store
            .create_issue("apitest", &make_draft("Same", "alice"))
            .unwrap();
        let b = store
            .create_issue("apitest", &make_draft("Same", "alice"))
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_list_unknown_project_is_an_error() {
        let store = InMemoryStore::new();
        let result = store.list_issues("ghost", &IssueFilters::default());
        assert!(matches!(result, Err(Error::ProjectNotFound { .. })));
    }

    #[test]
    fn test_list_filters_compose_conjunctively() {
        let mut store = InMemoryStore::new();
        store
            .create_issue("apitest", &make_draft("A", "alice"))
            .unwrap();
        store
            .create_issue("apitest", &make_draft("B", "alice"))
            .unwrap();
        store
            .create_issue("apitest", &make_draft("A", "bob"))
            .unwrap();

        let both = store
            .list_issues(
                "apitest",
                &IssueFilters {
                    issue_title: Some("A".to_string()),
                    created_by: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].issue_title, "A");
        assert_eq!(both[0].created_by, "alice");
    }

    #[test]
    fn test_list_open_filter_is_strict() {
        let mut store = InMemoryStore::new();
        let kept = store
            .create_issue("apitest", &make_draft("Open", "alice"))
            .unwrap();
        let closed = store
            .create_issue("apitest", &make_draft("Closed", "alice"))
            .unwrap();
        store
            .update_issue(
                "apitest",
                &closed.id,
                &IssueUpdate {
                    open: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let open = store
            .list_issues(
                "apitest",
                &IssueFilters {
                    open: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, kept.id);

        let shut = store
            .list_issues(
                "apitest",
                &IssueFilters {
                    open: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(shut.len(), 1);
        assert_eq!(shut[0].id, closed.id);
    }

    #[test]
    fn test_update_merges_and_bumps_updated_on() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("Original", "alice"))
            .unwrap();

        let updated = store
            .update_issue(
                "apitest",
                &issue.id,
                &IssueUpdate {
                    issue_text: Some("New body".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.issue_text, "New body");
        // Untouched fields unchanged
        assert_eq!(updated.issue_title, "Original");
        assert_eq!(updated.created_on, issue.created_on);
        assert!(updated.updated_on > issue.updated_on);
    }

    #[test]
    fn test_update_ignores_empty_strings() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("Keep me", "alice"))
            .unwrap();

        store
            .update_issue(
                "apitest",
                &issue.id,
                &IssueUpdate {
                    issue_title: Some(String::new()),
                    assigned_to: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let fetched = store.get_issue("apitest", &issue.id).unwrap();
        assert_eq!(fetched.issue_title, "Keep me");
        assert_eq!(fetched.assigned_to, "bob");
    }

    #[test]
    fn test_update_can_close_issue() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("Close me", "alice"))
            .unwrap();

        let updated = store
            .update_issue(
                "apitest",
                &issue.id,
                &IssueUpdate {
                    open: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.open);
    }

    #[test]
    fn test_update_empty_rejected() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("X", "alice"))
            .unwrap();

        let result = store.update_issue("apitest", &issue.id, &IssueUpdate::default());
        assert!(matches!(result, Err(Error::NoUpdateFields { .. })));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = InMemoryStore::new();
        store
            .create_issue("apitest", &make_draft("X", "alice"))
            .unwrap();

        let update = IssueUpdate {
            assigned_to: Some("bob".to_string()),
            ..Default::default()
        };
        let result = store.update_issue("apitest", "it-nope", &update);
        assert!(matches!(result, Err(Error::IssueNotFound { .. })));

        // Unknown project reports the same shape
        let result = store.update_issue("ghost", "it-nope", &update);
        assert!(matches!(result, Err(Error::IssueNotFound { .. })));
    }

    #[test]
    fn test_update_preserves_position() {
        let mut store = InMemoryStore::new();
        let first = store
            .create_issue("apitest", &make_draft("First", "alice"))
            .unwrap();
        store
            .create_issue("apitest", &make_draft("Second", "alice"))
            .unwrap();

        store
            .update_issue(
                "apitest",
                &first.id,
                &IssueUpdate {
                    status_text: Some("triaged".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let listed = store
            .list_issues("apitest", &IssueFilters::default())
            .unwrap();
        assert_eq!(listed[0].id, first.id, "updated issue must keep its slot");
    }

    #[test]
    fn test_delete_then_delete_again() {
        let mut store = InMemoryStore::new();
        let issue = store
            .create_issue("apitest", &make_draft("Delete me", "alice"))
            .unwrap();

        store.delete_issue("apitest", &issue.id).unwrap();
        let listed = store
            .list_issues("apitest", &IssueFilters::default())
            .unwrap();
        assert!(listed.iter().all(|i| i.id != issue.id));

        // Second delete of the same id fails
        let result = store.delete_issue("apitest", &issue.id);
        assert!(matches!(result, Err(Error::IssueNotFound { .. })));
    }

    #[test]
    fn test_delete_unknown_leaves_state_alone() {
        let mut store = InMemoryStore::new();
        store
            .create_issue("apitest", &make_draft("Stays", "alice"))
            .unwrap();
        store.clear_dirty();

        assert!(store.delete_issue("apitest", "it-nope").is_err());
        assert!(!store.is_dirty());
        assert_eq!(store.get_project("apitest").unwrap().issues.len(), 1);
    }

    #[test]
    fn test_flush_is_noop_for_ephemeral_store() {
        let mut store = InMemoryStore::new();
        store
            .create_issue("apitest", &make_draft("X", "alice"))
            .unwrap();
        assert!(store.is_dirty());
        store.flush().unwrap();
    }

    #[test]
    fn test_roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.jsonl");

        let mut store = InMemoryStore::open_or_create(&path).unwrap();
        let a = store
            .create_issue("apitest", &make_draft("First", "alice"))
            .unwrap();
        let b = store
            .create_issue("apitest", &make_draft("Second", "bob"))
            .unwrap();
        store
            .create_issue("other", &make_draft("Elsewhere", "carol"))
            .unwrap();
        store.flush().unwrap();
        assert!(!store.is_dirty());

        let loaded = InMemoryStore::open(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let issues = loaded
            .list_issues("apitest", &IssueFilters::default())
            .unwrap();
        assert_eq!(issues.len(), 2);
        // Order preserved across the roundtrip
        assert_eq!(issues[0].id, a.id);
        assert_eq!(issues[1].id, b.id);
        assert_eq!(issues[1].created_by, "bob");
    }
}
