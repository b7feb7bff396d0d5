//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! List Manager は具体的な永続化や時刻の取得方法を知らず、
//! 起動時に注入された実装だけを使います。

pub mod clock;
pub mod id_generator;
pub mod todo_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::todo_store::{StoreError, TodoStore};
