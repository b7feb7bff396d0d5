//! Application state and store lifecycle.

use std::sync::Arc;

use todomemo_core::TodoList;
use todomemo_core::impls::{FileTodoStore, InMemoryTodoStore};
use todomemo_core::ports::{StoreError, TodoStore};

use crate::config::ServerConfig;

// =============================================================================
// Storage
// =============================================================================

/// The store handle opened at startup and closed at shutdown.
pub enum Storage {
    InMemory(Arc<InMemoryTodoStore>),
    File(Arc<FileTodoStore>),
}

impl Storage {
    /// `TODOMEMO_DATA_FILE` があればファイル、なければメモリ
    pub async fn open(config: &ServerConfig) -> Result<Self, StoreError> {
        match &config.data_file {
            Some(path) => Ok(Self::File(Arc::new(FileTodoStore::open(path).await?))),
            None => {
                tracing::warn!("TODOMEMO_DATA_FILE is not set; todos are kept in memory only");
                Ok(Self::InMemory(Arc::new(InMemoryTodoStore::new())))
            }
        }
    }

    pub fn handle(&self) -> Arc<dyn TodoStore> {
        match self {
            Self::InMemory(store) => Arc::clone(store) as Arc<dyn TodoStore>,
            Self::File(store) => Arc::clone(store) as Arc<dyn TodoStore>,
        }
    }

    /// Teardown: flush whatever needs flushing.
    pub async fn close(&self) -> Result<(), StoreError> {
        match self {
            Self::InMemory(_) => Ok(()),
            Self::File(store) => {
                store.flush().await?;
                tracing::info!(path = %store.path().display(), "file store closed");
                Ok(())
            }
        }
    }
}

// =============================================================================
// AppState
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub todos: TodoList,
}

impl AppState {
    pub fn new(todos: TodoList) -> Self {
        Self { todos }
    }
}
