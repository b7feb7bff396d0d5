//! App - アプリケーション層
//!
//! ports を組み合わせて List Manager を実装します。
//!
//! # 主要コンポーネント
//! - **TodoListBuilder**: store / clock / id generator のワイヤリング
//! - **TodoList**: create / list / update / delete

pub mod builder;
pub mod todo_list;

pub use self::builder::{BuildError, TodoListBuilder};
pub use self::todo_list::TodoList;
