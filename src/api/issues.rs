//! Handlers for `/api/issues/{project}`.
//!
//! Contract notes:
//! - Listing a nonexistent project returns an error object, not an
//!   empty array.
//! - Validation and not-found outcomes are 200-status JSON payloads.
//! - `open` is strict boolean in both filter and update; the update
//!   accepts a JSON bool or the strings "true"/"false"/"1"/"0".

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::error;

use issues_lib::{Error, IssueFilters, IssueUpdate, NewIssue};

use super::AppState;

/// Liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

// ============================================================================
// Wire types
// ============================================================================

/// Query parameters accepted by GET. Unknown parameters are ignored.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    #[serde(rename = "_id")]
    id: Option<String>,
    issue_title: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    open: Option<String>,
}

/// POST body. Required fields default to empty so a missing field
/// follows the "required field(s) missing" path instead of a 422.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
    #[serde(default)]
    issue_title: String,
    #[serde(default)]
    issue_text: String,
    #[serde(default)]
    created_by: String,
    assigned_to: Option<String>,
    status_text: Option<String>,
}

/// PUT body: the target id plus any subset of the six update fields.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    #[serde(rename = "_id")]
    id: Option<String>,
    issue_title: Option<String>,
    issue_text: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    status_text: Option<String>,
    #[serde(default, deserialize_with = "de_open")]
    open: Option<bool>,
}

/// DELETE body: just the target id.
#[derive(Debug, Deserialize)]
pub struct DeleteBody {
    #[serde(rename = "_id")]
    id: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpResult {
    result: &'static str,
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Serialize)]
struct OpError {
    error: &'static str,
    #[serde(rename = "_id")]
    id: String,
}

fn parse_open(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Accept `open` as a bool or as a string, for clients that submit
/// form-style values. Anything unrecognized is treated as not sent.
fn de_open<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Bool(b)) => Some(b),
        Some(Raw::Str(s)) => parse_open(&s),
    })
}

/// Extract the id of a mutation body. Blank counts as missing.
fn require_id(id: Option<String>) -> issues_lib::Result<String> {
    id.filter(|value| !value.trim().is_empty())
        .ok_or(Error::MissingId)
}

/// Validation and not-found errors stay inside the 200-status JSON
/// contract; their messages are the error `Display` strings.
fn contract_error(err: &Error) -> Response {
    Json(json!({"error": err.to_string()})).into_response()
}

/// Storage failures get a server-error response, outside the
/// 200-status contract.
fn storage_failure(err: &Error) -> Response {
    error!(%err, "storage failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "storage failure"})),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET: list issues, every set filter applied conjunctively.
pub async fn list(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filters = IssueFilters {
        id: query.id,
        issue_title: query.issue_title,
        created_by: query.created_by,
        assigned_to: query.assigned_to,
        open: query.open.as_deref().and_then(parse_open),
    };

    let store = state.store.read().await;
    match store.list_issues(&project, &filters) {
        Ok(issues) => Json(issues).into_response(),
        Err(err @ Error::ProjectNotFound { .. }) => contract_error(&err),
        Err(err) => storage_failure(&err),
    }
}

/// POST: create an issue, upserting the project.
pub async fn create(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<CreateBody>,
) -> Response {
    let draft = NewIssue {
        issue_title: body.issue_title,
        issue_text: body.issue_text,
        created_by: body.created_by,
        assigned_to: body.assigned_to,
        status_text: body.status_text,
    };

    let mut store = state.store.write().await;
    match store.create_issue(&project, &draft) {
        Ok(issue) => match store.flush() {
            Ok(()) => Json(issue).into_response(),
            Err(err) => storage_failure(&err),
        },
        Err(err @ Error::RequiredFieldsMissing) => contract_error(&err),
        Err(err) => storage_failure(&err),
    }
}

/// PUT: merge a partial update into one issue.
pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Response {
    let id = match require_id(body.id) {
        Ok(id) => id,
        Err(err) => return contract_error(&err),
    };

    let fields = IssueUpdate {
        issue_title: body.issue_title,
        issue_text: body.issue_text,
        created_by: body.created_by,
        assigned_to: body.assigned_to,
        status_text: body.status_text,
        open: body.open,
    };

    let mut store = state.store.write().await;
    match store.update_issue(&project, &id, &fields) {
        Ok(_) => match store.flush() {
            Ok(()) => Json(OpResult {
                result: "successfully updated",
                id,
            })
            .into_response(),
            Err(err) => storage_failure(&err),
        },
        Err(Error::NoUpdateFields { .. }) => Json(OpError {
            error: "no update field(s) sent",
            id,
        })
        .into_response(),
        Err(Error::IssueNotFound { .. }) => Json(OpError {
            error: "could not update",
            id,
        })
        .into_response(),
        Err(err) => storage_failure(&err),
    }
}

/// DELETE: remove one issue by id.
pub async fn remove(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<DeleteBody>,
) -> Response {
    let id = match require_id(body.id) {
        Ok(id) => id,
        Err(err) => return contract_error(&err),
    };

    let mut store = state.store.write().await;
    match store.delete_issue(&project, &id) {
        Ok(()) => match store.flush() {
            Ok(()) => Json(OpResult {
                result: "successfully deleted",
                id,
            })
            .into_response(),
            Err(err) => storage_failure(&err),
        },
        Err(Error::IssueNotFound { .. }) => Json(OpError {
            error: "could not delete",
            id,
        })
        .into_response(),
        Err(err) => storage_failure(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_variants() {
        assert_eq!(parse_open("true"), Some(true));
        assert_eq!(parse_open("TRUE"), Some(true));
        assert_eq!(parse_open("1"), Some(true));
        assert_eq!(parse_open("false"), Some(false));
        assert_eq!(parse_open("0"), Some(false));
        assert_eq!(parse_open("maybe"), None);
    }

    #[test]
    fn test_update_body_open_accepts_bool_and_string() {
        let body: UpdateBody =
            serde_json::from_str(r#"{"_id": "it-1", "open": false}"#).unwrap();
        assert_eq!(body.open, Some(false));

        let body: UpdateBody =
            serde_json::from_str(r#"{"_id": "it-1", "open": "false"}"#).unwrap();
        assert_eq!(body.open, Some(false));

        let body: UpdateBody = serde_json::from_str(r#"{"_id": "it-1"}"#).unwrap();
        assert_eq!(body.open, None);
    }

    #[test]
    fn test_blank_id_counts_as_missing() {
        assert!(matches!(require_id(None), Err(Error::MissingId)));
        assert!(matches!(
            require_id(Some("  ".to_string())),
            Err(Error::MissingId)
        ));
        assert_eq!(require_id(Some("it-1".to_string())).unwrap(), "it-1");
    }
}
