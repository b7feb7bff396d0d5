//! TodoPatch - 部分更新リクエスト
//!
//! 各フィールドは「指定されたかどうか」を `Option` で明示的に持ちます。
//!
//! # 互換ルール
//! 既存クライアントとの互換のため、次の値は「未指定」として扱います（エラーにはしない）。
//! - `order: 0`
//! - `value: ""`
//!
//! 負の order はそのまま受け付けて swap に回します。
//! 51 文字以上の value だけは ValidationError になります。

use super::errors::ValidationError;
use super::todo::{Order, TodoValue};

/// 完了状態の変更指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneChange {
    /// doneAt を現在時刻にする
    MarkDone,
    /// doneAt をクリアする
    MarkUndone,
}

impl From<bool> for DoneChange {
    fn from(done: bool) -> Self {
        if done { Self::MarkDone } else { Self::MarkUndone }
    }
}

/// Validated partial update for a single Todo.
///
/// `None` のフィールドは変更しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub order: Option<Order>,
    pub done: Option<DoneChange>,
    pub value: Option<TodoValue>,
}

impl TodoPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reorder target. `0` means "not supplied" and leaves the order untouched.
    pub fn with_order(mut self, order: Order) -> Self {
        if order != 0 {
            self.order = Some(order);
        }
        self
    }

    pub fn with_done(mut self, done: impl Into<DoneChange>) -> Self {
        self.done = Some(done.into());
        self
    }

    /// New text. An empty string means "not supplied"; over 50 characters is rejected.
    pub fn with_value(mut self, raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if !raw.is_empty() {
            self.value = Some(TodoValue::parse(raw)?);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_none() && self.done.is_none() && self.value.is_none()
    }
}
