//! TodoListBuilder - List Manager の構築とワイヤリング
//!
//! # 方針
//! - store は明示的に注入する（モジュールレベルの接続シングルトンは持たない）
//! - 起動時検証（Fail-fast）: store 未設定なら build() がエラー
//! - clock / id generator は省略時に本番用の実装を使う

use std::sync::Arc;

use crate::ports::{Clock, IdGenerator, SystemClock, TodoStore, UlidGenerator};

use super::todo_list::TodoList;

/// TodoListBuilder は TodoList を構築
///
/// # 使用例
/// ```ignore
/// let list = TodoList::builder()
///     .store(InMemoryTodoStore::new())
///     .build()?;
/// ```
#[derive(Default)]
pub struct TodoListBuilder {
    store: Option<Arc<dyn TodoStore>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

/// BuildError は List Manager 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no TodoStore was configured. Call `store()` or `shared_store()` before `build()`.")]
    MissingStore,
}

impl TodoListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// store を所有権ごと渡す
    pub fn store<S: TodoStore + 'static>(self, store: S) -> Self {
        self.shared_store(Arc::new(store))
    }

    /// 呼び出し側でもハンドルを保持したい場合（teardown で flush するなど）
    pub fn shared_store(mut self, store: Arc<dyn TodoStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// # 検証
    /// - store が設定されていなければ BuildError::MissingStore
    pub fn build(self) -> Result<TodoList, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        Ok(TodoList::new(store, clock, ids))
    }
}
