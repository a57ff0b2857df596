use std::collections::HashSet;

use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client};

use super::{InteractionStore, ItemCounts};
use crate::{
    db::StoreKey,
    error::{AppError, AppResult},
    models::{Interaction, ItemId, RecordOutcome, UserId},
};

/// Redis-backed interaction store
///
/// Each user owns a set of item ids; `SADD` is atomic, so its reply decides
/// whether this call stored the pair. The first `recorded_at` is written with
/// `HSETNX` and never overwritten.
#[derive(Clone)]
pub struct RedisInteractionStore {
    redis_client: Client,
}

impl RedisInteractionStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl InteractionStore for RedisInteractionStore {
    async fn record(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<RecordOutcome> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let (added, _, _): (i64, i64, i64) = redis::pipe()
            .atomic()
            .sadd(StoreKey::UserItems(user_id.clone()).to_string(), item_id.as_str())
            .hset_nx(
                StoreKey::RecordedAt(user_id.clone()).to_string(),
                item_id.as_str(),
                Utc::now().to_rfc3339(),
            )
            .sadd(StoreKey::Users.to_string(), user_id.as_str())
            .query_async(&mut conn)
            .await?;

        if added > 0 {
            Ok(RecordOutcome::Recorded)
        } else {
            tracing::debug!(user_id = %user_id, item_id = %item_id, "Interaction already recorded");
            Ok(RecordOutcome::AlreadyRecorded)
        }
    }

    async fn interactions_of(&self, user_id: &UserId) -> AppResult<HashSet<ItemId>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let members: HashSet<String> = conn
            .smembers(StoreKey::UserItems(user_id.clone()).to_string())
            .await?;

        Ok(members.iter().filter_map(ItemId::parse).collect())
    }

    async fn counts_excluding(&self, excluding: Option<&UserId>) -> AppResult<ItemCounts> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let users: HashSet<String> = conn.smembers(StoreKey::Users.to_string()).await?;

        let others: Vec<UserId> = users
            .iter()
            .filter_map(UserId::parse)
            .filter(|user_id| Some(user_id) != excluding)
            .collect();

        if others.is_empty() {
            return Ok(ItemCounts::new());
        }

        let mut pipe = redis::pipe();
        for user_id in &others {
            pipe.smembers(StoreKey::UserItems(user_id.clone()).to_string());
        }
        let sets: Vec<HashSet<String>> = pipe.query_async(&mut conn).await?;

        let mut counts = ItemCounts::new();
        for item_id in sets.iter().flatten().filter_map(ItemId::parse) {
            *counts.entry(item_id).or_insert(0) += 1;
        }

        tracing::debug!(
            users = others.len(),
            items = counts.len(),
            "Aggregated interactions from Redis"
        );

        Ok(counts)
    }

    async fn find(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<Option<Interaction>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn
            .hget(
                StoreKey::RecordedAt(user_id.clone()).to_string(),
                item_id.as_str(),
            )
            .await?;

        stored
            .map(|raw| {
                let recorded_at = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| AppError::Internal(format!("Bad recorded_at in Redis: {}", e)))?
                    .with_timezone(&Utc);
                Ok(Interaction {
                    user_id: user_id.clone(),
                    item_id: item_id.clone(),
                    recorded_at,
                })
            })
            .transpose()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
