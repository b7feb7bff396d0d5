//! Domain model (ids, todo record, patch, ordering rules, errors).
//!
//! - ids: TodoId（ULID ベース）
//! - todo: Todo レコードと検証済み TodoValue
//! - patch: 部分更新（フィールドごとの明示的な指定有無）
//! - ordering: order の採番と swap の判定（純粋関数）
//! - errors: ValidationError / TodoError

pub mod errors;
pub mod ids;
pub mod ordering;
pub mod patch;
pub mod todo;

pub use self::errors::{TodoError, ValidationError};
pub use self::ids::TodoId;
pub use self::ordering::{Reorder, apply_patch, next_order, plan_reorder};
pub use self::patch::{DoneChange, TodoPatch};
pub use self::todo::{FIRST_ORDER, Order, Todo, TodoValue};
