use std::sync::Arc;

use crate::data::model::HiddenSet;
use crate::error::Result;
use crate::store::{self, DurableStore};

/// Owns the session's hidden set and routes every change through the store.
///
/// Each mutation re-reads the persisted set, computes the next set, writes
/// it, and only then replaces the in-memory copy. A failed write leaves the
/// previous set in place.
pub struct HiddenSetManager {
    store: Arc<dyn DurableStore>,
    current: HiddenSet,
}

impl HiddenSetManager {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            current: HiddenSet::new(),
        }
    }

    pub fn current(&self) -> &HiddenSet {
        &self.current
    }

    /// Reload from the store. On read failure the last known set is kept.
    pub async fn refresh(&mut self) -> &HiddenSet {
        match store::load_hidden(self.store.as_ref()).await {
            Ok(hidden) => self.current = hidden,
            Err(e) => log::warn!("Using last known hidden set: {e}"),
        }
        &self.current
    }

    /// Flip `id` relative to the set this session last rendered, then apply
    /// that as a hide or show on the freshly read set. Another session's
    /// change to the same id is overwritten, never inverted.
    pub async fn toggle(&mut self, id: &str) -> Result<&HiddenSet> {
        let hide = !self.current.contains(id);
        let latest = self.refresh().await;
        let next = if hide {
            latest.with_all([id])
        } else {
            latest.without_all([id])
        };
        self.commit(next).await
    }

    pub async fn bulk_hide(&mut self, ids: &[String]) -> Result<&HiddenSet> {
        let next = self.refresh().await.with_all(ids.iter().cloned());
        self.commit(next).await
    }

    pub async fn bulk_show(&mut self, ids: &[String]) -> Result<&HiddenSet> {
        let next = self.refresh().await.without_all(ids);
        self.commit(next).await
    }

    pub async fn clear_all(&mut self) -> Result<&HiddenSet> {
        self.commit(HiddenSet::new()).await
    }

    async fn commit(&mut self, next: HiddenSet) -> Result<&HiddenSet> {
        store::save_hidden(self.store.as_ref(), &next).await?;
        log::info!("Committed hidden set ({} hidden)", next.len());
        self.current = next;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::error::Error;
    use crate::store::{MemoryStore, HIDDEN_MODULES_KEY};

    /// Reads from an inner store, refuses every write.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl DurableStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, _value: JsonValue) -> Result<()> {
            Err(Error::StoreWrite {
                key: key.to_string(),
                reason: "read-only".to_string(),
            })
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[tokio::test]
    async fn test_toggle_persists_before_commit() {
        let store = MemoryStore::new();
        let mut manager = HiddenSetManager::new(Arc::new(store.clone()));

        manager.toggle("m1").await.unwrap();
        assert!(manager.current().contains("m1"));
        assert!(store::load_hidden(&store).await.unwrap().contains("m1"));

        manager.toggle("m1").await.unwrap();
        assert!(manager.current().is_empty());
        assert!(store::load_hidden(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_operations() {
        let store = MemoryStore::new();
        let mut manager = HiddenSetManager::new(Arc::new(store.clone()));

        manager.bulk_hide(&ids(&["a", "b", "b"])).await.unwrap();
        assert_eq!(manager.current().len(), 2);

        manager.bulk_show(&ids(&["b", "not-hidden"])).await.unwrap();
        assert_eq!(manager.current().iter().collect::<Vec<_>>(), vec!["a"]);

        manager.clear_all().await.unwrap();
        assert!(manager.current().is_empty());
        assert!(store::load_hidden(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutation_builds_on_other_session_write() {
        let store = MemoryStore::new();
        let mut ours = HiddenSetManager::new(Arc::new(store.clone()));
        let mut theirs = HiddenSetManager::new(Arc::new(store.clone()));

        theirs.toggle("x").await.unwrap();
        ours.toggle("y").await.unwrap();

        let persisted = store::load_hidden(&store).await.unwrap();
        assert_eq!(persisted.iter().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_toggle_follows_rendered_state_not_store() {
        let store = MemoryStore::new();
        let mut ours = HiddenSetManager::new(Arc::new(store.clone()));
        let mut theirs = HiddenSetManager::new(Arc::new(store.clone()));
        ours.refresh().await;
        theirs.refresh().await;

        // "a" is visible to us; the other session hides it meanwhile.
        theirs.toggle("a").await.unwrap();
        ours.toggle("a").await.unwrap();

        assert!(ours.current().contains("a"));
        assert!(store::load_hidden(&store).await.unwrap().contains("a"));

        // Showing it again from a view that has it hidden.
        theirs.toggle("a").await.unwrap();
        assert!(!store::load_hidden(&store).await.unwrap().contains("a"));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_set() {
        let inner = MemoryStore::new();
        inner
            .set(HIDDEN_MODULES_KEY, serde_json::json!(["a"]))
            .await
            .unwrap();
        let mut manager = HiddenSetManager::new(Arc::new(ReadOnlyStore(inner)));
        manager.refresh().await;

        let err = manager.toggle("b").await.unwrap_err();
        assert!(matches!(err, Error::StoreWrite { .. }));
        assert_eq!(manager.current().iter().collect::<Vec<_>>(), vec!["a"]);
    }

    proptest! {
        #[test]
        fn test_toggle_twice_restores(
            start in prop::collection::btree_set("[a-d]{1,2}", 0..6),
            id in "[a-d]{1,2}",
        ) {
            let store = MemoryStore::new();
            let initial: HiddenSet = start.into_iter().collect();
            block_on(async {
                store::save_hidden(&store, &initial).await.unwrap();
                let mut manager = HiddenSetManager::new(Arc::new(store.clone()));
                manager.refresh().await;
                manager.toggle(&id).await.unwrap();
                manager.toggle(&id).await.unwrap();
                prop_assert_eq!(manager.current(), &initial);
                Ok(())
            })?;
        }

        #[test]
        fn test_bulk_hide_is_idempotent(
            start in prop::collection::btree_set("[a-d]{1,2}", 0..6),
            batch in prop::collection::vec("[a-f]{1,2}", 0..6),
        ) {
            let store = MemoryStore::new();
            let initial: HiddenSet = start.into_iter().collect();
            block_on(async {
                store::save_hidden(&store, &initial).await.unwrap();
                let mut manager = HiddenSetManager::new(Arc::new(store.clone()));
                let once = manager.bulk_hide(&batch).await.unwrap().clone();
                let twice = manager.bulk_hide(&batch).await.unwrap().clone();
                prop_assert_eq!(once, twice);
                Ok(())
            })?;
        }
    }
}
