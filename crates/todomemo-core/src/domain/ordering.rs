//! Ordering rules: order assignment on create and the reorder swap.
//!
//! These are pure functions: given the records read from the store they
//! return what should be written back. The actual writes are issued by
//! `TodoList` (app layer).

use chrono::{DateTime, Utc};

use super::ids::TodoId;
use super::patch::{DoneChange, TodoPatch};
use super::todo::{FIRST_ORDER, Order, Todo};

/// Order for a newly created item, given the current top item (if any).
pub fn next_order(top: Option<&Todo>) -> Order {
    top.map_or(FIRST_ORDER, |todo| todo.order + 1)
}

/// Reorder decision for one moved item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    /// The item already holds the target order.
    Unchanged,

    /// Nobody holds the target; the item takes it alone.
    /// May leave a gap or duplicate when the target is outside the current range.
    Take { order: Order },

    /// Pairwise swap with the current occupant of the target.
    Swap {
        order: Order,
        displaced: TodoId,
        displaced_to: Order,
    },
}

impl Reorder {
    /// The occupant's write, if one is needed before the moved item is saved.
    pub fn displaced(&self) -> Option<(TodoId, Order)> {
        match self {
            Self::Swap {
                displaced,
                displaced_to,
                ..
            } => Some((*displaced, *displaced_to)),
            _ => None,
        }
    }
}

/// Decide how `moving` reaches `target`.
///
/// # Arguments
/// * `moving` - the item being moved (as currently stored)
/// * `target` - requested order
/// * `occupant` - the item currently stored at `target`, if any
pub fn plan_reorder(moving: &Todo, target: Order, occupant: Option<&Todo>) -> Reorder {
    if moving.order == target {
        return Reorder::Unchanged;
    }
    match occupant {
        Some(other) if other.id != moving.id => Reorder::Swap {
            order: target,
            displaced: other.id,
            displaced_to: moving.order,
        },
        _ => Reorder::Take { order: target },
    }
}

/// Merge every present field of `patch` onto `todo`.
///
/// `now` is used when the patch marks the item done.
pub fn apply_patch(todo: &mut Todo, patch: &TodoPatch, now: DateTime<Utc>) {
    if let Some(order) = patch.order {
        todo.order = order;
    }
    match patch.done {
        Some(DoneChange::MarkDone) => todo.mark_done(now),
        Some(DoneChange::MarkUndone) => todo.mark_undone(),
        None => {}
    }
    if let Some(value) = &patch.value {
        todo.value = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoValue;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use ulid::Ulid;

    fn todo_at(order: Order) -> Todo {
        Todo::new(
            TodoId::from_ulid(Ulid::new()),
            TodoValue::parse(format!("item {order}")).unwrap(),
            order,
        )
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_item_gets_order_one() {
        assert_eq!(next_order(None), 1);
    }

    #[rstest]
    #[case(1, 2)]
    #[case(7, 8)]
    #[case(41, 42)]
    fn next_order_follows_the_top_item(#[case] top: Order, #[case] expected: Order) {
        assert_eq!(next_order(Some(&todo_at(top))), expected);
    }

    #[test]
    fn moving_onto_an_occupied_order_swaps() {
        let a = todo_at(3);
        let b = todo_at(7);

        let plan = plan_reorder(&a, 7, Some(&b));

        assert_eq!(
            plan,
            Reorder::Swap {
                order: 7,
                displaced: b.id,
                displaced_to: 3,
            }
        );
        assert_eq!(plan.displaced(), Some((b.id, 3)));
    }

    #[test]
    fn moving_onto_an_empty_order_takes_it_alone() {
        let a = todo_at(3);

        let plan = plan_reorder(&a, 99, None);

        assert_eq!(plan, Reorder::Take { order: 99 });
        assert_eq!(plan.displaced(), None);
    }

    #[test]
    fn moving_onto_own_order_is_unchanged() {
        let a = todo_at(3);

        assert_eq!(plan_reorder(&a, 3, Some(&a)), Reorder::Unchanged);
    }

    #[rstest]
    fn apply_patch_merges_only_present_fields(now: DateTime<Utc>) {
        let mut todo = todo_at(4);
        let before = todo.clone();

        apply_patch(&mut todo, &TodoPatch::new().with_value("renamed").unwrap(), now);

        assert_eq!(todo.value.as_str(), "renamed");
        assert_eq!(todo.order, before.order);
        assert_eq!(todo.done_at, before.done_at);
    }

    #[rstest]
    fn apply_patch_toggles_done(now: DateTime<Utc>) {
        let mut todo = todo_at(1);

        apply_patch(&mut todo, &TodoPatch::new().with_done(true), now);
        assert_eq!(todo.done_at, Some(now));

        apply_patch(&mut todo, &TodoPatch::new(), now);
        assert_eq!(todo.done_at, Some(now));

        apply_patch(&mut todo, &TodoPatch::new().with_done(false), now);
        assert_eq!(todo.done_at, None);
    }
}
