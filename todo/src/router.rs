//! Todo HTTP router.
//!
//! Composes the todo handlers and health probes into a single Axum router.

use crate::handlers;
use crate::types::{TodoAction, TodoState};
use crate::{TodoEnvironment, TodoReducer, TodoStore};
use axum::{
    routing::{get, post},
    Router,
};
use todo_store_web::handlers::{health_check, health_check_with_store};

/// Create the todo router with all endpoints.
///
/// # Routes
///
/// - `GET /list` - Every todo and its completion flag
/// - `POST /add` - Store a todo
/// - `POST /toggle` - Flip a todo's completion flag
/// - `GET /health` - Liveness probe
/// - `GET /health/ready` - Store health
pub fn todo_router(store: TodoStore) -> Router {
    Router::new()
        .route("/list", get(handlers::list_todos))
        .route("/add", post(handlers::add_todo))
        .route("/toggle", post(handlers::toggle_todo))
        .route("/health", get(health_check))
        .route(
            "/health/ready",
            get(health_check_with_store::<TodoState, TodoAction, TodoEnvironment, TodoReducer>),
        )
        .with_state(store)
}
