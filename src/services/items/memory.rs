use std::collections::HashMap;

use tokio::sync::RwLock;

use super::ItemStore;
use crate::{
    error::AppResult,
    models::{Item, ItemId},
};

/// Item store held in process memory, for local runs and tests
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn insert(&self, item: Item) {
        let mut items = self.items.write().await;
        items.insert(item.id.clone(), item);
    }

    pub async fn remove(&self, id: &ItemId) -> Option<Item> {
        let mut items = self.items.write().await;
        items.remove(id)
    }
}

#[async_trait::async_trait]
impl ItemStore for MemoryItemStore {
    async fn fetch_by_ids(&self, ids: &[ItemId]) -> AppResult<Vec<Item>> {
        let items = self.items.read().await;
        // HashMap iteration order, not request order
        Ok(items
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
