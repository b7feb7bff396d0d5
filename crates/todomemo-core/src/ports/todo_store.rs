//! TodoStore port - Todo レコードの正本（source of truth）
//!
//! List Manager はこの trait 越しにしか永続化層に触れません。
//! 実装は `impls` にあります：
//! - **InMemoryTodoStore**: 開発・テスト用
//! - **FileTodoStore**: JSON スナップショットへの永続化

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Order, Todo, TodoId};

/// StoreError は永続化層のエラー（List Manager はリトライしない）
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// TodoStore はドキュメントコレクションとしての Todo 置き場
///
/// # 設計原則
/// - 書き込みはドキュメント単位で直列化される（複数ドキュメントをまたぐ保証はない）
/// - order の一意性制約は持たない（swap は List Manager の責務）
/// - 存在しない id への `save` / `delete` は `Ok(false)` を返す
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// 新しいレコードを追加
    async fn insert(&self, todo: Todo) -> Result<(), StoreError>;

    /// id で 1 件取得
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// order が完全一致する 1 件を取得（重複時はいずれか 1 件）
    async fn find_by_order(&self, order: Order) -> Result<Option<Todo>, StoreError>;

    /// order が最大の 1 件を取得
    async fn find_top(&self) -> Result<Option<Todo>, StoreError>;

    /// 全件を order 降順で取得
    async fn list_by_order_desc(&self) -> Result<Vec<Todo>, StoreError>;

    /// 既存レコードを丸ごと上書き。存在しなければ `Ok(false)`
    async fn save(&self, todo: &Todo) -> Result<bool, StoreError>;

    /// id で削除。存在しなければ `Ok(false)`
    async fn delete(&self, id: TodoId) -> Result<bool, StoreError>;
}
