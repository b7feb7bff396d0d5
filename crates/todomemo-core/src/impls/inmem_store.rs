//! InMemoryTodoStore - 開発・テスト用の TodoStore
//!
//! # 実装詳細
//! - BTreeMap<TodoId, Todo> を tokio の Mutex で保護
//! - BTreeMap なので走査順が決定的（order が重複した場合も結果が安定する）
//! - 1 回のメソッド呼び出しが 1 ドキュメント操作（複数呼び出しをまたぐロックはしない）

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Order, Todo, TodoId};
use crate::ports::{StoreError, TodoStore};

/// In-memory store. Cloning shares the same underlying collection.
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<Mutex<BTreeMap<TodoId, Todo>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のレコードから作成（FileTodoStore の読み込みで使用）
    ///
    /// 同じ id が複数あれば後のレコードが残る。
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let mut map = BTreeMap::new();
        for todo in todos {
            let id = todo.id;
            if map.insert(id, todo).is_some() {
                tracing::warn!(%id, "duplicate todo id on load; keeping the later record");
            }
        }
        Self {
            todos: Arc::new(Mutex::new(map)),
        }
    }

    /// 全件のコピー（id 順）
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.todos.lock().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.todos.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.lock().await.is_empty()
    }
}

fn sort_by_order_desc(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.order.cmp(&a.order).then_with(|| a.id.cmp(&b.id)));
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.lock().await;
        if todos.contains_key(&todo.id) {
            return Err(StoreError::Unavailable(format!(
                "duplicate id on insert: {}",
                todo.id
            )));
        }
        todos.insert(todo.id, todo);
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.lock().await.get(&id).cloned())
    }

    async fn find_by_order(&self, order: Order) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.lock().await;
        Ok(todos.values().find(|todo| todo.order == order).cloned())
    }

    async fn find_top(&self) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.lock().await;
        // 同じ order が複数あれば id が小さい方
        Ok(todos
            .values()
            .fold(None::<&Todo>, |top, todo| match top {
                Some(current) if current.order >= todo.order => Some(current),
                _ => Some(todo),
            })
            .cloned())
    }

    async fn list_by_order_desc(&self) -> Result<Vec<Todo>, StoreError> {
        let mut todos: Vec<Todo> = self.todos.lock().await.values().cloned().collect();
        sort_by_order_desc(&mut todos);
        Ok(todos)
    }

    async fn save(&self, todo: &Todo) -> Result<bool, StoreError> {
        let mut todos = self.todos.lock().await;
        match todos.get_mut(&todo.id) {
            Some(stored) => {
                *stored = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        Ok(self.todos.lock().await.remove(&id).is_some())
    }
}
