//! Route table and handlers.
//!
//! | Method        | Path                          | Result                      |
//! |---------------|-------------------------------|-----------------------------|
//! | GET           | `/health`                     | service info                |
//! | GET           | `/api/todos?filter=&q=&sort=` | visible todos               |
//! | POST          | `/api/todos`                  | `201` + created todo        |
//! | GET           | `/api/todos/stats`            | counts                      |
//! | PUT / PATCH   | `/api/todos/:id`              | updated todo                |
//! | DELETE        | `/api/todos/:id`              | `204`, also for unknown ids |
//! | POST          | `/api/todos/clear-completed`  | `{ "removed": n }`          |
//! | POST          | `/api/todos/toggle-all`       | whole list                  |

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use todo_core::models::{Filter, SortOrder, Todo, TodoId, TodoStats};
use todo_runtime::{TodoHandle, TodoPatch};

use crate::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoHandle,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    /// Case-insensitive text search.
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub text: String,
}

/// Build the application router with permissive CORS.
pub fn create_router(todos: TodoHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/stats", get(stats))
        .route("/api/todos/clear-completed", post(clear_completed))
        .route("/api/todos/toggle-all", post(toggle_all))
        .route(
            "/api/todos/:id",
            put(update_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(AppState { todos })
        .layer(ServiceBuilder::new().layer(cors))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "todo-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(params) = params?;
    let filter = parse_or_default::<Filter>(params.filter.as_deref())?;
    let sort = parse_or_default::<SortOrder>(params.sort.as_deref())?;
    let query = params.q.as_deref().filter(|q| !q.trim().is_empty());
    Ok(Json(state.todos.view(filter, query, sort)))
}

async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(body) = body?;
    let todo = state.todos.add(body.text).await?;
    debug!(id = %todo.id, "created todo via api");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn stats(State(state): State<AppState>) -> Json<TodoStats> {
    Json(state.todos.stats())
}

async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    patch: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = patch?;
    let todo = state.todos.update(TodoId(id), patch).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.todos.delete(TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_completed(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.todos.clear_completed().await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

async fn toggle_all(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    state.todos.toggle_all().await?;
    Ok(Json(state.todos.snapshot()))
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Parse an optional query value, treating absence as the default and a bad
/// value as a `400`.
fn parse_or_default<T>(value: Option<&str>) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = todo_core::TodoError> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(v) if v.trim().is_empty() => Ok(T::default()),
        Some(v) => v.parse().map_err(ApiError::from),
    }
}
