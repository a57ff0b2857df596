use std::sync::Arc;

use crate::services::{
    interactions::{InteractionStore, MemoryInteractionStore},
    items::{ItemStore, MemoryItemStore},
    RecommendationEngine,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self { engine }
    }

    /// State wired to the given stores with the default recommendation limit
    pub fn from_stores(
        interactions: Arc<dyn InteractionStore>,
        items: Arc<dyn ItemStore>,
    ) -> Self {
        Self::new(RecommendationEngine::new(interactions, items))
    }

    /// State backed entirely by in-memory stores
    pub fn in_memory(items: MemoryItemStore) -> Self {
        Self::from_stores(Arc::new(MemoryInteractionStore::new()), Arc::new(items))
    }
}
