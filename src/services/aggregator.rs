use crate::{
    error::AppResult,
    models::UserId,
    services::interactions::{InteractionStore, ItemCounts},
};

/// Computes population-wide interaction counts per item
///
/// Interactions belonging to `excluding` do not contribute. Without a
/// requester (anonymous caller) nothing is excluded. The mapping is sparse:
/// items with no qualifying interaction are absent rather than zero.
pub async fn aggregate(
    store: &dyn InteractionStore,
    excluding: Option<&UserId>,
) -> AppResult<ItemCounts> {
    let mut counts = store.counts_excluding(excluding).await?;
    counts.retain(|_, count| *count > 0);

    tracing::debug!(
        store = store.name(),
        excluding = ?excluding.map(UserId::as_str),
        candidates = counts.len(),
        "Aggregated interaction counts"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;
    use crate::services::interactions::MemoryInteractionStore;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn item(id: &str) -> ItemId {
        ItemId::parse(id).unwrap()
    }

    async fn seeded_store() -> MemoryInteractionStore {
        let store = MemoryInteractionStore::new();
        for (u, i) in [("A", "1"), ("B", "1"), ("C", "1"), ("B", "2"), ("C", "2"), ("C", "3")] {
            store.record(&user(u), &item(i)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_mapping() {
        let store = MemoryInteractionStore::new();
        let counts = aggregate(&store, None).await.unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_counts_whole_population() {
        let store = seeded_store().await;
        let counts = aggregate(&store, None).await.unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&item("1")], 3);
        assert_eq!(counts[&item("2")], 2);
        assert_eq!(counts[&item("3")], 1);
    }

    #[tokio::test]
    async fn test_requester_interactions_do_not_count() {
        let store = seeded_store().await;
        let counts = aggregate(&store, Some(&user("C"))).await.unwrap();

        assert_eq!(counts[&item("1")], 2);
        assert_eq!(counts[&item("2")], 1);
        // Only C touched item 3
        assert!(!counts.contains_key(&item("3")));
    }

    #[tokio::test]
    async fn test_unknown_requester_excludes_nothing() {
        let store = seeded_store().await;
        let counts = aggregate(&store, Some(&user("Z"))).await.unwrap();
        assert_eq!(counts, aggregate(&store, None).await.unwrap());
    }
}
