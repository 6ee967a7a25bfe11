//! Query, creation, and update types for issue operations.

use crate::model::Issue;

/// Fields submitted when creating an issue.
///
/// `issue_title`, `issue_text`, and `created_by` are required and must
/// be non-empty; the rest default to empty strings.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl NewIssue {
    /// Whether all required fields are present and non-empty.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        !self.issue_title.is_empty() && !self.issue_text.is_empty() && !self.created_by.is_empty()
    }
}

/// Fields to merge into an existing issue.
///
/// Text fields are applied only when present and non-empty, so an
/// update cannot clear a text field. `open` applies whenever present,
/// including `Some(false)`, so issues can be closed.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueUpdate {
    /// True when no field would be applied. Empty strings count as
    /// not sent, matching the wire-level "no update field(s) sent"
    /// check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        fn blank(field: Option<&String>) -> bool {
            field.is_none_or(String::is_empty)
        }
        blank(self.issue_title.as_ref())
            && blank(self.issue_text.as_ref())
            && blank(self.created_by.as_ref())
            && blank(self.assigned_to.as_ref())
            && blank(self.status_text.as_ref())
            && self.open.is_none()
    }
}

/// Filter options for listing issues within a project.
///
/// Every set filter must match (conjunction). String fields compare by
/// exact equality; `open` by strict boolean equality.
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub open: Option<bool>,
}

impl IssueFilters {
    /// Whether the issue satisfies all set filters.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(ref id) = self.id {
            if issue.id != *id {
                return false;
            }
        }
        if let Some(ref title) = self.issue_title {
            if issue.issue_title != *title {
                return false;
            }
        }
        if let Some(ref creator) = self.created_by {
            if issue.created_by != *creator {
                return false;
            }
        }
        if let Some(ref assignee) = self.assigned_to {
            if issue.assigned_to != *assignee {
                return false;
            }
        }
        if let Some(open) = self.open {
            if issue.open != open {
                return false;
            }
        }
        true
    }
}
