use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::AppResult,
    models::{Interaction, Item, ItemId, RecordOutcome, UserId},
    services::{
        aggregator, hydrator,
        interactions::InteractionStore,
        items::ItemStore,
        ranker::{self, DEFAULT_LIMIT},
    },
};

/// Popularity-based recommendations for content items
///
/// Recommends the items most interacted with by everybody else, minus the
/// ones the requesting user has already seen. Counts are recomputed on every
/// request from the current interaction set; nothing is cached.
#[derive(Clone)]
pub struct RecommendationEngine {
    interactions: Arc<dyn InteractionStore>,
    items: Arc<dyn ItemStore>,
    default_limit: usize,
}

impl RecommendationEngine {
    pub fn new(interactions: Arc<dyn InteractionStore>, items: Arc<dyn ItemStore>) -> Self {
        Self {
            interactions,
            items,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Overrides the limit used when a caller does not give one
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Records that a user interacted with an item
    ///
    /// Missing or blank ids make this a no-op (`Ignored`), never an error:
    /// callers report on best-effort signals such as page views. Store
    /// failures are returned to the caller.
    pub async fn report_interaction(
        &self,
        user_id: Option<&str>,
        item_id: Option<&str>,
    ) -> AppResult<RecordOutcome> {
        let (Some(user_id), Some(item_id)) = (
            user_id.and_then(UserId::parse),
            item_id.and_then(ItemId::parse),
        ) else {
            tracing::debug!("Ignoring interaction report with missing ids");
            return Ok(RecordOutcome::Ignored);
        };

        let outcome = self.interactions.record(&user_id, &item_id).await?;

        tracing::debug!(
            user_id = %user_id,
            item_id = %item_id,
            outcome = ?outcome,
            store = self.interactions.name(),
            "Interaction reported"
        );

        Ok(outcome)
    }

    /// Audit read of one stored interaction
    pub async fn find_interaction(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> AppResult<Option<Interaction>> {
        self.interactions.find(user_id, item_id).await
    }

    /// Ranked item ids for a user, without hydration
    ///
    /// An absent or blank `user_id` is an anonymous caller: nothing is
    /// excluded and the whole population counts.
    pub async fn recommend_ids(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Vec<ItemId>> {
        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let requester = user_id.and_then(UserId::parse);

        let (counts, seen) = tokio::try_join!(
            aggregator::aggregate(self.interactions.as_ref(), requester.as_ref()),
            self.seen_by(requester.as_ref()),
        )?;

        let ranked = ranker::rank(&counts, &seen, limit);

        tracing::info!(
            user_id = ?requester.as_ref().map(UserId::as_str),
            candidates = counts.len(),
            excluded = seen.len(),
            ranked = ranked.len(),
            limit,
            "Ranked recommendations"
        );

        Ok(ranked)
    }

    /// Recommended items for a user, most popular first
    pub async fn get_recommendations(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Vec<Item>> {
        let start = Instant::now();

        let ranked = self.recommend_ids(user_id, limit).await?;
        let items = hydrator::hydrate(self.items.as_ref(), &ranked).await?;

        tracing::info!(
            hydrated = items.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations completed"
        );

        Ok(items)
    }

    async fn seen_by(&self, requester: Option<&UserId>) -> AppResult<HashSet<ItemId>> {
        match requester {
            Some(user_id) => self.interactions.interactions_of(user_id).await,
            None => Ok(HashSet::new()),
        }
    }
}
