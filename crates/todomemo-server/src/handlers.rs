//! HTTP handlers for `/todos`.
//!
//! Handlers only translate between HTTP and `TodoList`; every rule lives in
//! the core crate.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use todomemo_core::TodoId;

use crate::dto::{
    CreateTodoRequest, CreateTodoResponse, EmptyResponse, HealthResponse, ListTodosResponse,
    UpdateTodoRequest,
};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// An id that cannot be parsed cannot exist either.
fn parse_todo_id(raw: &str) -> Result<TodoId, ApiErrorResponse> {
    raw.parse()
        .map_err(|_| ApiErrorResponse::not_found(format!("todo {raw} does not exist")))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /todos` → 201 `{todo}`
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTodoResponse>), ApiErrorResponse> {
    let Json(request) = payload?;

    let todo = state.todos.create(request.value).await?;

    Ok((StatusCode::CREATED, Json(CreateTodoResponse { todo })))
}

/// `GET /todos` → 200 `{todos}` (order desc)
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<ListTodosResponse>, ApiErrorResponse> {
    let todos = state.todos.list().await?;

    Ok(Json(ListTodosResponse { todos }))
}

/// `PATCH /todos/{todo_id}` → 200 `{}`
///
/// 未知の id は body の内容に関係なく 404。
pub async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, ApiErrorResponse> {
    let id = parse_todo_id(&todo_id)?;
    state.todos.get(id).await?;

    let Json(request) = payload?;
    let patch = request.into_patch()?;

    state.todos.update(id, patch).await?;

    Ok(Json(EmptyResponse::default()))
}

/// `DELETE /todos/{todo_id}` → 200 `{}`
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<Json<EmptyResponse>, ApiErrorResponse> {
    let id = parse_todo_id(&todo_id)?;

    state.todos.delete(id).await?;

    Ok(Json(EmptyResponse::default()))
}
