//! todomemo-core
//!
//! Ordered single-list task tracking: the List Manager and its ports.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, todo, patch, ordering, errors）
//! - **ports**: 抽象化レイヤー（TodoStore, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（TodoListBuilder, TodoList）
//! - **impls**: 実装（InMemoryTodoStore, FileTodoStore）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, TodoList, TodoListBuilder};
pub use domain::{DoneChange, Order, Todo, TodoError, TodoId, TodoPatch, TodoValue, ValidationError};
