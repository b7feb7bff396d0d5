//! Request/response bodies for the `/todos` API.

use serde::{Deserialize, Deserializer, Serialize};
use todomemo_core::{Order, Todo, TodoPatch, ValidationError};

// =============================================================================
// Requests
// =============================================================================

/// `POST /todos`
///
/// 未知のフィールドは拒否する（400）。
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    pub value: String,
}

/// `PATCH /todos/{todo_id}`
///
/// `done` は 3 状態:
/// - 省略: 変更しない
/// - `null` / `false`: 未完了に戻す
/// - `true`: 完了にする
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub order: Option<Order>,

    #[serde(default, deserialize_with = "present")]
    pub done: Option<Option<bool>>,

    #[serde(default)]
    pub value: Option<String>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateTodoRequest {
    /// Build the domain patch. `order: 0` and `value: ""` count as not supplied.
    pub fn into_patch(self) -> Result<TodoPatch, ValidationError> {
        let mut patch = TodoPatch::new();
        if let Some(order) = self.order {
            patch = patch.with_order(order);
        }
        if let Some(done) = self.done {
            patch = patch.with_done(done.unwrap_or(false));
        }
        if let Some(value) = self.value {
            patch = patch.with_value(value)?;
        }
        Ok(patch)
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateTodoResponse {
    pub todo: Todo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTodosResponse {
    pub todos: Vec<Todo>,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyResponse {}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
