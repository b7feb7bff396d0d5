//! FileTodoStore - JSON スナップショットに永続化する TodoStore
//!
//! # ライフサイクル
//! - `open()`: ファイルがあれば読み込む（init）
//! - 書き込み系メソッドの成功ごとにスナップショット全体を書き出す
//! - `flush()`: 終了時に最後のスナップショットを書き出す（teardown）
//!
//! 書き出しは一時ファイルに書いてから rename するので、
//! 途中でプロセスが落ちても壊れたファイルは残らない。
//!
//! 書き出しに失敗した書き込みはメモリ上でも巻き戻す（呼び出し側にはエラーが返る）。
//! ただし巻き戻しの前に並行する別の書き込みが flush した場合、その分はディスクに残る。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::InMemoryTodoStore;
use crate::domain::{Order, Todo, TodoId};
use crate::ports::{StoreError, TodoStore};

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    todos: Vec<Todo>,
}

pub struct FileTodoStore {
    path: PathBuf,
    inner: InMemoryTodoStore,
    /// スナップショットの書き出しを直列化する
    write_lock: Mutex<()>,
}

impl FileTodoStore {
    /// Load `path` if it exists, otherwise start empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            path = %path.display(),
            todos = snapshot.todos.len(),
            "opened file store"
        );
        Ok(Self {
            path,
            inner: InMemoryTodoStore::with_todos(snapshot.todos),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current state to disk.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let snapshot = Snapshot {
            todos: self.inner.snapshot().await,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), todos = snapshot.todos.len(), "flushed file store");
        Ok(())
    }
}

#[async_trait]
impl TodoStore for FileTodoStore {
    async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
        let id = todo.id;
        self.inner.insert(todo).await?;
        if let Err(error) = self.flush().await {
            tracing::warn!(%id, %error, "flush failed; rolling back insert");
            self.inner.delete(id).await?;
            return Err(error);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_order(&self, order: Order) -> Result<Option<Todo>, StoreError> {
        self.inner.find_by_order(order).await
    }

    async fn find_top(&self) -> Result<Option<Todo>, StoreError> {
        self.inner.find_top().await
    }

    async fn list_by_order_desc(&self) -> Result<Vec<Todo>, StoreError> {
        self.inner.list_by_order_desc().await
    }

    async fn save(&self, todo: &Todo) -> Result<bool, StoreError> {
        let Some(previous) = self.inner.find_by_id(todo.id).await? else {
            return Ok(false);
        };
        if !self.inner.save(todo).await? {
            return Ok(false);
        }
        if let Err(error) = self.flush().await {
            tracing::warn!(id = %todo.id, %error, "flush failed; rolling back save");
            self.inner.save(&previous).await?;
            return Err(error);
        }
        Ok(true)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        let Some(previous) = self.inner.find_by_id(id).await? else {
            return Ok(false);
        };
        if !self.inner.delete(id).await? {
            return Ok(false);
        }
        if let Err(error) = self.flush().await {
            tracing::warn!(%id, %error, "flush failed; rolling back delete");
            self.inner.insert(previous).await?;
            return Err(error);
        }
        Ok(true)
    }
}
