//! TodoList - List Manager（順序付きリストの操作）
//!
//! # フロー
//! 1. TodoStore から必要なレコードを読む
//! 2. `domain::ordering` の純粋関数で書き戻す内容を決める
//! 3. TodoStore に書き込む
//!
//! # 並行性
//! 読み取り→判定→書き込みの間にロックは取らない。
//! - 同時 create は同じ order を割り当てうる
//! - reorder の 2 回の書き込み（押し出される側 → 移動する側）はアトミックではない。
//!   2 回目が失敗しても 1 回目は巻き戻さない

use std::sync::Arc;

use crate::domain::{
    Todo, TodoError, TodoId, TodoPatch, TodoValue, apply_patch, next_order, plan_reorder,
};
use crate::ports::{Clock, IdGenerator, TodoStore};

use super::builder::TodoListBuilder;

/// The List Manager. Holds no state of its own besides the injected ports.
#[derive(Clone)]
pub struct TodoList {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoList {
    pub(crate) fn new(
        store: Arc<dyn TodoStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }

    pub fn builder() -> TodoListBuilder {
        TodoListBuilder::new()
    }

    /// Create a new item at the top of the list.
    ///
    /// # Errors
    /// - `TodoError::Validation` if `value` is empty or longer than 50 characters
    pub async fn create(&self, value: impl Into<String>) -> Result<Todo, TodoError> {
        let value = TodoValue::parse(value)?;

        let top = self.store.find_top().await?;
        let order = next_order(top.as_ref());
        let todo = Todo::new(self.ids.generate_todo_id(), value, order);

        self.store.insert(todo.clone()).await?;
        tracing::info!(id = %todo.id, order = todo.order, "created todo");
        Ok(todo)
    }

    /// All items, highest order first.
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.list_by_order_desc().await?)
    }

    pub async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// Apply the present fields of `patch` to the item `id`.
    ///
    /// Reorder is a pairwise swap: the item currently at the target order is
    /// saved first with the moved item's old order, then the moved item is
    /// saved with every patched field merged in.
    ///
    /// # Errors
    /// - `TodoError::NotFound` if no item has `id` (nothing is written)
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<(), TodoError> {
        let mut current = self.get(id).await?;

        if let Some(target) = patch.order {
            let occupant = self.store.find_by_order(target).await?;
            let plan = plan_reorder(&current, target, occupant.as_ref());
            if let (Some(mut displaced), Some((_, displaced_to))) = (occupant, plan.displaced()) {
                tracing::debug!(
                    moved = %current.id,
                    displaced = %displaced.id,
                    from = current.order,
                    to = target,
                    "swapping order"
                );
                displaced.order = displaced_to;
                self.store.save(&displaced).await?;
            }
        }

        apply_patch(&mut current, &patch, self.clock.now());

        if !self.store.save(&current).await? {
            // 読み取り後に別リクエストで削除された
            return Err(TodoError::NotFound(id));
        }
        tracing::debug!(id = %id, order = current.order, done = current.is_done(), "updated todo");
        Ok(())
    }

    /// Permanently remove `id`. Remaining orders are left as they are.
    ///
    /// # Errors
    /// - `TodoError::NotFound` if no item has `id`
    pub async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let todo = self.get(id).await?;

        if !self.store.delete(todo.id).await? {
            return Err(TodoError::NotFound(id));
        }
        tracing::info!(id = %id, order = todo.order, "deleted todo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, ValidationError};
    use crate::impls::InMemoryTodoStore;
    use crate::ports::{FixedClock, StoreError};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;
    use ulid::Ulid;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn list_with(store: InMemoryTodoStore, now: DateTime<Utc>) -> TodoList {
        TodoList::builder()
            .store(store)
            .clock(FixedClock::new(now))
            .build()
            .unwrap()
    }

    fn unknown_id() -> TodoId {
        TodoId::from_ulid(Ulid::new())
    }

    async fn orders(list: &TodoList) -> Vec<(String, Order)> {
        list.list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.value.as_str().to_string(), t.order))
            .collect()
    }

    // ---- create ----

    #[rstest]
    #[tokio::test]
    async fn first_item_in_empty_store_gets_order_one(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);

        let todo = list.create("first").await.unwrap();

        assert_eq!(todo.order, 1);
        assert_eq!(todo.done_at, None);
        assert_eq!(list.get(todo.id).await.unwrap(), todo);
    }

    #[rstest]
    #[tokio::test]
    async fn new_item_gets_max_plus_one(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();
        list.update(a.id, TodoPatch::new().with_order(10))
            .await
            .unwrap();

        let c = list.create("c").await.unwrap();

        assert_eq!(c.order, 11);
    }

    #[rstest]
    #[tokio::test]
    async fn orders_are_not_compacted_after_delete(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        list.create("a").await.unwrap();
        let b = list.create("b").await.unwrap();
        list.delete(b.id).await.unwrap();

        let c = list.create("c").await.unwrap();

        // a=1 が最大なので c=2（b の番号が再利用される）
        assert_eq!(c.order, 2);
        assert_eq!(orders(&list).await, vec![("c".into(), 2), ("a".into(), 1)]);
    }

    #[rstest]
    #[case(String::new())]
    #[case("x".repeat(51))]
    #[tokio::test]
    async fn invalid_value_is_rejected_without_writing(#[case] raw: String, now: DateTime<Utc>) {
        let store = InMemoryTodoStore::new();
        let list = list_with(store.clone(), now);

        let err = list.create(raw).await.unwrap_err();

        assert!(err.is_validation());
        assert!(store.is_empty().await);
    }

    #[rstest]
    #[case(1)]
    #[case(50)]
    #[tokio::test]
    async fn boundary_lengths_are_accepted(#[case] len: usize, now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);

        let todo = list.create("x".repeat(len)).await.unwrap();

        assert_eq!(todo.value.as_str().len(), len);
    }

    // ---- list ----

    #[rstest]
    #[tokio::test]
    async fn list_is_sorted_by_order_desc(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        for v in ["a", "b", "c", "d"] {
            list.create(v).await.unwrap();
        }

        let orders: Vec<Order> = list.list().await.unwrap().iter().map(|t| t.order).collect();

        assert_eq!(orders, vec![4, 3, 2, 1]);
    }

    // ---- reorder ----

    #[rstest]
    #[tokio::test]
    async fn reorder_swaps_with_the_occupant(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let mut ids = Vec::new();
        for v in ["o1", "o2", "a", "o4", "o5", "o6", "b"] {
            ids.push(list.create(v).await.unwrap().id);
        }
        let (a, b) = (ids[2], ids[6]);

        list.update(a, TodoPatch::new().with_order(7))
            .await
            .unwrap();

        assert_eq!(list.get(a).await.unwrap().order, 7);
        assert_eq!(list.get(b).await.unwrap().order, 3);
        assert_eq!(
            orders(&list).await,
            vec![
                ("a".into(), 7),
                ("o6".into(), 6),
                ("o5".into(), 5),
                ("o4".into(), 4),
                ("b".into(), 3),
                ("o2".into(), 2),
                ("o1".into(), 1),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reorder_to_an_unoccupied_order_moves_only_that_item(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();

        list.update(a.id, TodoPatch::new().with_order(10))
            .await
            .unwrap();

        // 1 が空いたまま残る（gap は補正しない）
        assert_eq!(orders(&list).await, vec![("a".into(), 10), ("b".into(), 2)]);
    }

    #[rstest]
    #[tokio::test]
    async fn swap_after_a_gap_uses_current_orders(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        let b = list.create("b").await.unwrap();
        list.update(a.id, TodoPatch::new().with_order(5))
            .await
            .unwrap();
        list.delete(b.id).await.unwrap();
        let c = list.create("c").await.unwrap();
        assert_eq!(c.order, 6);

        // a は 5 にいるので c との swap になる
        list.update(c.id, TodoPatch::new().with_order(5))
            .await
            .unwrap();
        assert_eq!(orders(&list).await, vec![("a".into(), 6), ("c".into(), 5)]);
    }

    #[rstest]
    #[tokio::test]
    async fn reorder_to_own_order_changes_nothing(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();

        list.update(a.id, TodoPatch::new().with_order(1))
            .await
            .unwrap();

        assert_eq!(orders(&list).await, vec![("b".into(), 2), ("a".into(), 1)]);
    }

    // ---- toggle / edit ----

    #[rstest]
    #[tokio::test]
    async fn done_toggles_done_at(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();

        list.update(a.id, TodoPatch::new().with_done(true)).await.unwrap();
        assert_eq!(list.get(a.id).await.unwrap().done_at, Some(now));

        list.update(a.id, TodoPatch::new()).await.unwrap();
        assert_eq!(list.get(a.id).await.unwrap().done_at, Some(now));

        list.update(a.id, TodoPatch::new().with_done(false)).await.unwrap();
        assert_eq!(list.get(a.id).await.unwrap().done_at, None);
    }

    #[rstest]
    #[tokio::test]
    async fn edit_replaces_only_the_value(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("before").await.unwrap();
        list.update(a.id, TodoPatch::new().with_done(true)).await.unwrap();

        list.update(a.id, TodoPatch::new().with_value("after").unwrap())
            .await
            .unwrap();

        let edited = list.get(a.id).await.unwrap();
        assert_eq!(edited.value.as_str(), "after");
        assert_eq!(edited.order, a.order);
        assert_eq!(edited.done_at, Some(now));
    }

    #[rstest]
    #[tokio::test]
    async fn all_fields_apply_in_one_update(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        let b = list.create("b").await.unwrap();

        let patch = TodoPatch::new()
            .with_order(2)
            .with_done(true)
            .with_value("a2")
            .unwrap();
        list.update(a.id, patch).await.unwrap();

        let a = list.get(a.id).await.unwrap();
        assert_eq!((a.value.as_str(), a.order, a.done_at), ("a2", 2, Some(now)));
        assert_eq!(list.get(b.id).await.unwrap().order, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn zero_order_and_empty_value_are_ignored(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();

        let patch = TodoPatch::new()
            .with_order(0)
            .with_done(true)
            .with_value("")
            .unwrap();
        list.update(a.id, patch).await.unwrap();

        let a = list.get(a.id).await.unwrap();
        assert_eq!((a.value.as_str(), a.order, a.done_at), ("a", 1, Some(now)));
    }

    #[rstest]
    #[tokio::test]
    async fn negative_order_is_taken_as_is(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();

        list.update(a.id, TodoPatch::new().with_order(-1)).await.unwrap();

        assert_eq!(orders(&list).await, vec![("b".into(), 2), ("a".into(), -1)]);
    }

    #[rstest]
    #[tokio::test]
    async fn edit_over_the_limit_leaves_the_item_untouched(now: DateTime<Utc>) {
        let store = InMemoryTodoStore::new();
        let list = list_with(store.clone(), now);
        list.create("a").await.unwrap();
        let before = store.snapshot().await;

        let err = TodoPatch::new().with_value("x".repeat(51)).unwrap_err();

        assert_eq!(err.field, "value");
        assert_eq!(store.snapshot().await, before);
    }

    // ---- delete / not found ----

    #[rstest]
    #[tokio::test]
    async fn deleted_item_is_gone(now: DateTime<Utc>) {
        let list = list_with(InMemoryTodoStore::new(), now);
        let a = list.create("a").await.unwrap();
        list.create("b").await.unwrap();

        list.delete(a.id).await.unwrap();

        assert!(list.list().await.unwrap().iter().all(|t| t.id != a.id));
        assert!(list.get(a.id).await.unwrap_err().is_not_found());
        assert!(list.delete(a.id).await.unwrap_err().is_not_found());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_id_fails_without_mutation(now: DateTime<Utc>) {
        let store = InMemoryTodoStore::new();
        let list = list_with(store.clone(), now);
        list.create("a").await.unwrap();
        list.create("b").await.unwrap();
        let before = store.snapshot().await;

        let patch = TodoPatch::new()
            .with_order(1)
            .with_done(true)
            .with_value("x")
            .unwrap();
        let update_err = list.update(unknown_id(), patch).await.unwrap_err();
        let delete_err = list.delete(unknown_id()).await.unwrap_err();

        assert!(update_err.is_not_found());
        assert!(delete_err.is_not_found());
        assert_eq!(store.snapshot().await, before);
    }

    // ---- store failures ----

    /// `save` が指定回数目から失敗する store
    struct FlakyStore {
        inner: InMemoryTodoStore,
        saves: AtomicUsize,
        fail_from: usize,
    }

    #[async_trait]
    impl TodoStore for FlakyStore {
        async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
            self.inner.insert(todo).await
        }
        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_order(&self, order: Order) -> Result<Option<Todo>, StoreError> {
            self.inner.find_by_order(order).await
        }
        async fn find_top(&self) -> Result<Option<Todo>, StoreError> {
            self.inner.find_top().await
        }
        async fn list_by_order_desc(&self) -> Result<Vec<Todo>, StoreError> {
            self.inner.list_by_order_desc().await
        }
        async fn save(&self, todo: &Todo) -> Result<bool, StoreError> {
            if self.saves.fetch_add(1, Ordering::SeqCst) + 1 >= self.fail_from {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.save(todo).await
        }
        async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
            self.inner.delete(id).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn failed_second_swap_write_is_not_compensated(now: DateTime<Utc>) {
        let inner = InMemoryTodoStore::new();
        let seed = list_with(inner.clone(), now);
        let a = seed.create("a").await.unwrap();
        let b = seed.create("b").await.unwrap();

        let list = TodoList::builder()
            .store(FlakyStore {
                inner: inner.clone(),
                saves: AtomicUsize::new(0),
                fail_from: 2,
            })
            .clock(FixedClock::new(now))
            .build()
            .unwrap();

        let err = list
            .update(a.id, TodoPatch::new().with_order(2))
            .await
            .unwrap_err();

        assert!(matches!(err, TodoError::Store(_)));
        // b は 1 に移動済み、a は 1 のまま（重複）
        assert_eq!(seed.get(b.id).await.unwrap().order, 1);
        assert_eq!(seed.get(a.id).await.unwrap().order, 1);
    }

    /// `find_top` の読み取り後、2 つの create が揃うまで待つ store
    struct RacingStore {
        inner: InMemoryTodoStore,
        barrier: Barrier,
    }

    #[async_trait]
    impl TodoStore for RacingStore {
        async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
            self.inner.insert(todo).await
        }
        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_order(&self, order: Order) -> Result<Option<Todo>, StoreError> {
            self.inner.find_by_order(order).await
        }
        async fn find_top(&self) -> Result<Option<Todo>, StoreError> {
            let top = self.inner.find_top().await;
            self.barrier.wait().await;
            top
        }
        async fn list_by_order_desc(&self) -> Result<Vec<Todo>, StoreError> {
            self.inner.list_by_order_desc().await
        }
        async fn save(&self, todo: &Todo) -> Result<bool, StoreError> {
            self.inner.save(todo).await
        }
        async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
            self.inner.delete(id).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_creates_may_share_an_order(now: DateTime<Utc>) {
        let inner = InMemoryTodoStore::new();
        let list = TodoList::builder()
            .store(RacingStore {
                inner: inner.clone(),
                barrier: Barrier::new(2),
            })
            .clock(FixedClock::new(now))
            .build()
            .unwrap();

        let (a, b) = tokio::join!(list.create("a"), list.create("b"));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.id, b.id);
        assert_eq!((a.order, b.order), (1, 1));
        assert_eq!(inner.len().await, 2);
    }

    #[test]
    fn validation_error_converts_into_todo_error() {
        let err: TodoError = ValidationError::new("value", "must not be empty").into();
        assert!(err.is_validation());
    }
}
