//! HTTP handlers for the todo API.
//!
//! Mutations go through `Store::send`, which applies the reducer before it
//! returns, so a `/list` issued after an acknowledged `/add` observes it.

use crate::types::{Snapshot, TodoAction, TodoState};
use crate::TodoStore;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use todo_store_web::{CorrelationId, WebResult};

/// Request to store a todo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddTodoRequest {
    /// Todo name.
    pub name: String,

    /// Completion flag; missing or `null` means not completed.
    #[serde(default, deserialize_with = "truthy")]
    pub completed: bool,
}

/// Reads any JSON value as a flag, the way a browser client would treat it:
/// `false`, `null`, `0` and `""` are not completed, everything else is.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Null => false,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Request to toggle a todo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToggleTodoRequest {
    /// Todo name.
    pub name: String,
}

/// Response listing every todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListResponse {
    /// Completion flag of every todo, keyed by name.
    pub todos: Snapshot,
}

/// Acknowledgement returned by mutations.
///
/// `error` is always `null` on success. Rejected requests use the same
/// field, so clients can read failures from one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ack {
    /// Failure message, `None` on success.
    pub error: Option<String>,
}

impl Ack {
    /// Successful acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { error: None }
    }
}

/// List every todo.
///
/// ```text
/// GET /list
/// ```
///
/// ```json
/// { "todos": { "Buy milk": false, "Walk dog": true } }
/// ```
pub async fn list_todos(State(store): State<TodoStore>) -> Json<ListResponse> {
    let todos = store.state(TodoState::snapshot).await;
    metrics::counter!("http.todo.list").increment(1);

    Json(ListResponse { todos })
}

/// Store a todo, overwriting an existing one with the same name.
///
/// ```text
/// POST /add
/// Content-Type: application/json
///
/// { "name": "Buy milk", "completed": false }
/// ```
///
/// ```json
/// { "error": null }
/// ```
pub async fn add_todo(
    State(store): State<TodoStore>,
    correlation_id: CorrelationId,
    payload: Result<Json<AddTodoRequest>, JsonRejection>,
) -> WebResult<Json<Ack>> {
    let Json(request) = payload?;
    tracing::info!(
        correlation_id = %correlation_id.0,
        name = %request.name,
        completed = request.completed,
        "Add todo"
    );

    store
        .send(TodoAction::AddTodo {
            name: request.name,
            completed: request.completed,
        })
        .await?;
    metrics::counter!("http.todo.add").increment(1);

    Ok(Json(Ack::ok()))
}

/// Flip a todo's completion flag. Unknown names are inserted as completed.
///
/// ```text
/// POST /toggle
/// Content-Type: application/json
///
/// { "name": "Buy milk" }
/// ```
///
/// ```json
/// { "error": null }
/// ```
pub async fn toggle_todo(
    State(store): State<TodoStore>,
    correlation_id: CorrelationId,
    payload: Result<Json<ToggleTodoRequest>, JsonRejection>,
) -> WebResult<Json<Ack>> {
    let Json(request) = payload?;
    tracing::info!(correlation_id = %correlation_id.0, name = %request.name, "Toggle todo");

    store
        .send(TodoAction::ToggleTodo { name: request.name })
        .await?;
    metrics::counter!("http.todo.toggle").increment(1);

    Ok(Json(Ack::ok()))
}
