//! IdGenerator port - ID 生成の抽象化
//!
//! ID は store ではなくアプリケーション側で採番します。
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::TodoId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は Todo の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数のリクエストタスクから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_todo_id(&self) -> TodoId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// FixedClock を渡すと timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_todo_id(&self) -> TodoId {
        // epoch より前の時刻は 0 に丸める
        let timestamp_ms = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        TodoId::from(ulid)
    }
}
