//! Errors - エラー型と分類
//!
//! List Manager の各操作は `Result<_, TodoError>` を返し、
//! HTTP 境界でステータスコードに変換されます。
//!
//! # 分類
//! - Validation: 入力不正（400、リトライ無意味）
//! - NotFound: 存在しない id を参照（404、リトライ無意味）
//! - Store: 永続化層の障害（そのまま伝播）

use thiserror::Error;

use super::ids::TodoId;
use crate::ports::StoreError;

/// 入力検証エラー（どのフィールドが、なぜ不正か）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// TodoError はドメインエラー
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("todo not found: {0}")]
    NotFound(TodoId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
