//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTodoStore**: 開発・テスト用の正本
//! - **FileTodoStore**: JSON ファイルに永続化する正本

pub mod file_store;
pub mod inmem_store;

pub use self::file_store::FileTodoStore;
pub use self::inmem_store::InMemoryTodoStore;
