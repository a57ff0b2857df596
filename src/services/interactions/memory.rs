use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{InteractionStore, ItemCounts};
use crate::{
    error::AppResult,
    models::{Interaction, ItemId, RecordOutcome, UserId},
};

/// In-process interaction store
///
/// Insert-if-absent runs under the write lock, so racing duplicate reports
/// cannot both insert. Reads take the read lock only for as long as it takes to
/// copy out the answer.
#[derive(Default)]
pub struct MemoryInteractionStore {
    inner: RwLock<HashMap<UserId, HashMap<ItemId, Interaction>>>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored facts
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.values().map(HashMap::len).sum()
    }
}

#[async_trait::async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn record(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<RecordOutcome> {
        let mut inner = self.inner.write().await;
        let items = inner.entry(user_id.clone()).or_default();

        if items.contains_key(item_id) {
            tracing::debug!(user_id = %user_id, item_id = %item_id, "Interaction already recorded");
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        items.insert(
            item_id.clone(),
            Interaction::new(user_id.clone(), item_id.clone()),
        );
        Ok(RecordOutcome::Recorded)
    }

    async fn interactions_of(&self, user_id: &UserId) -> AppResult<HashSet<ItemId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(user_id)
            .map(|items| items.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn counts_excluding(&self, excluding: Option<&UserId>) -> AppResult<ItemCounts> {
        let inner = self.inner.read().await;
        let mut counts = ItemCounts::new();

        for (user_id, items) in inner.iter() {
            if Some(user_id) == excluding {
                continue;
            }
            for item_id in items.keys() {
                *counts.entry(item_id.clone()).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    async fn find(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<Option<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(user_id)
            .and_then(|items| items.get(item_id))
            .cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn item(id: &str) -> ItemId {
        ItemId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn test_record_is_idempotent() {
        let store = MemoryInteractionStore::new();

        let first = store.record(&user("A"), &item("1")).await.unwrap();
        let second = store.record(&user("A"), &item("1")).await.unwrap();

        assert_eq!(first, RecordOutcome::Recorded);
        assert_eq!(second, RecordOutcome::AlreadyRecorded);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_keeps_original_timestamp() {
        let store = MemoryInteractionStore::new();
        store.record(&user("A"), &item("1")).await.unwrap();
        let original = store.find(&user("A"), &item("1")).await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.record(&user("A"), &item("1")).await.unwrap();

        let after = store.find(&user("A"), &item("1")).await.unwrap().unwrap();
        assert_eq!(original.recorded_at, after.recorded_at);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_store_one_fact() {
        let store = Arc::new(MemoryInteractionStore::new());

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.record(&user("A"), &item("1")).await.unwrap()
            }));
        }

        let mut recorded = 0;
        for task in tasks {
            if task.await.unwrap().is_new() {
                recorded += 1;
            }
        }

        assert_eq!(recorded, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_interactions_of_unknown_user_is_empty() {
        let store = MemoryInteractionStore::new();
        let seen = store.interactions_of(&user("ghost")).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_counts_skip_excluded_user() {
        let store = MemoryInteractionStore::new();
        store.record(&user("A"), &item("1")).await.unwrap();
        store.record(&user("A"), &item("2")).await.unwrap();
        store.record(&user("B"), &item("1")).await.unwrap();

        let counts = store.counts_excluding(Some(&user("A"))).await.unwrap();
        assert_eq!(counts.get(&item("1")), Some(&1));
        assert_eq!(counts.get(&item("2")), None);

        let all = store.counts_excluding(None).await.unwrap();
        assert_eq!(all.get(&item("1")), Some(&2));
        assert_eq!(all.get(&item("2")), Some(&1));
    }
}
