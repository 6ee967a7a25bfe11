//! HTTP surface for the issue tracking service.
//!
//! One resource route, `/api/issues/{project}`, carries the whole
//! CRUD contract; `/healthz` is a liveness probe. All logical
//! outcomes (validation failures, not-found) are HTTP 200 JSON
//! payloads; only storage failures surface as 500.

pub mod issues;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::sync::RwLock;

use issues_lib::InMemoryStore;

/// Shared application state: the document store behind a reader-writer
/// lock. Mutating handlers hold the write lock across the change and
/// the flush, so each request is one transaction.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
}

impl AppState {
    /// Wrap a store for sharing across handlers.
    #[must_use]
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

/// Build the service router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(issues::healthz))
        .route(
            "/api/issues/{project}",
            get(issues::list)
                .post(issues::create)
                .put(issues::update)
                .delete(issues::remove),
        )
        .with_state(state)
}
