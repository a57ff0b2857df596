use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{Item, ItemId},
    services::items::ItemStore,
};

/// Resolves a ranked id list into full items, keeping the rank order
///
/// The item store answers in any order and may leave out ids that were
/// deleted after ranking; those are dropped silently. Item store failures are
/// returned as-is, without retry.
pub async fn hydrate(item_store: &dyn ItemStore, ranked: &[ItemId]) -> AppResult<Vec<Item>> {
    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let fetched = item_store.fetch_by_ids(ranked).await?;
    let mut by_id: HashMap<ItemId, Item> = fetched
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    let hydrated: Vec<Item> = ranked.iter().filter_map(|id| by_id.remove(id)).collect();

    if hydrated.len() < ranked.len() {
        tracing::warn!(
            store = item_store.name(),
            requested = ranked.len(),
            hydrated = hydrated.len(),
            "Some ranked items are missing from the item store"
        );
    }

    Ok(hydrated)
}
