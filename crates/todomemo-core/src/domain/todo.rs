//! Todo record: value + position + completion state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;
use super::ids::TodoId;

/// List position. Higher values are displayed first.
pub type Order = i64;

/// 空のストアで最初に割り当てられる order
pub const FIRST_ORDER: Order = 1;

/// 検証済みのタスク本文（1〜50 文字）
///
/// 文字数は Unicode scalar value 単位で数えます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoValue(String);

impl TodoValue {
    pub const MAX_CHARS: usize = 50;

    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let len = raw.chars().count();
        if len == 0 {
            return Err(ValidationError::new("value", "must not be empty"));
        }
        if len > Self::MAX_CHARS {
            return Err(ValidationError::new(
                "value",
                format!(
                    "must be at most {} characters (got {len})",
                    Self::MAX_CHARS
                ),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TodoValue {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<TodoValue> for String {
    fn from(value: TodoValue) -> Self {
        value.0
    }
}

impl fmt::Display for TodoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single tracked entity.
///
/// - `order` の一意性は store 制約ではなく List Manager の swap で保たれる
/// - `done_at` が Some なら完了済み
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub value: TodoValue,
    pub order: Order,
    pub done_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// 新規作成（未完了）
    pub fn new(id: TodoId, value: TodoValue, order: Order) -> Self {
        Self {
            id,
            value,
            order,
            done_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }

    pub fn mark_done(&mut self, at: DateTime<Utc>) {
        self.done_at = Some(at);
    }

    pub fn mark_undone(&mut self) {
        self.done_at = None;
    }
}
