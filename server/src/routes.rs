//! Todo endpoints.
//!
//! Each handler opens one session, performs one store call through it and
//! lets the session drop on return. Path, query and body are all decoded
//! before the session is opened, so a malformed request never takes a
//! connection.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use todo_core::{Todo, TodoCreate, TodoUpdate};

use crate::error::ApiError;
use crate::extract::{DbSession, Payload, TodoId, Window};
use crate::AppState;

/// Todo routes. The collection answers both with and without a trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

/// POST /todos/ - create a todo
async fn create_todo(
    State(state): State<AppState>,
    Payload(input): Payload<TodoCreate>,
) -> Result<Json<Todo>, ApiError> {
    let mut session = state.session().await?;
    let todo = session.create(input).await?;
    tracing::info!(id = todo.id, "todo created");
    Ok(Json(todo))
}

/// GET /todos/?skip=&limit= - list a window of todos
async fn list_todos(
    Window(params): Window,
    DbSession(mut session): DbSession,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = session.list(params).await?;
    tracing::debug!(skip = params.skip, limit = params.limit, count = todos.len(), "todos listed");
    Ok(Json(todos))
}

/// GET /todos/{id}
async fn get_todo(
    TodoId(id): TodoId,
    DbSession(mut session): DbSession,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(session.get(id).await?))
}

/// PUT /todos/{id} - replace every field of a todo
async fn update_todo(
    TodoId(id): TodoId,
    State(state): State<AppState>,
    Payload(input): Payload<TodoUpdate>,
) -> Result<Json<Todo>, ApiError> {
    let mut session = state.session().await?;
    let todo = session.update(id, input).await?;
    tracing::info!(id, "todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/{id} - returns the row as it was before removal
async fn delete_todo(
    TodoId(id): TodoId,
    DbSession(mut session): DbSession,
) -> Result<Json<Todo>, ApiError> {
    let todo = session.delete(id).await?;
    tracing::info!(id, "todo deleted");
    Ok(Json(todo))
}
