/// Interaction storage abstraction
///
/// The store is the only owner of interaction facts. Backends differ in where
/// the facts live (process memory, PostgreSQL, Redis) but all of them enforce
/// at most one fact per `(user, item)` pair, with insert-if-absent performed
/// atomically by the backing store.
use std::collections::{HashMap, HashSet};

use crate::{
    error::AppResult,
    models::{Interaction, ItemId, RecordOutcome, UserId},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryInteractionStore;
pub use postgres::PgInteractionStore;
pub use redis::RedisInteractionStore;

/// Sparse per-item interaction counts. Items without interactions are absent.
pub type ItemCounts = HashMap<ItemId, u64>;

#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// Stores the pair unless it already exists
    ///
    /// Concurrent calls for the same pair collapse to one stored fact: exactly
    /// one caller observes `Recorded`, every other one `AlreadyRecorded`. An
    /// existing fact keeps its original `recorded_at`.
    async fn record(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<RecordOutcome>;

    /// Items the user has interacted with; empty for unknown users
    async fn interactions_of(&self, user_id: &UserId) -> AppResult<HashSet<ItemId>>;

    /// Counts interactions per item, skipping those belonging to `excluding`
    ///
    /// Each stored fact whose user differs from `excluding` contributes exactly
    /// one unit to its item. With `None`, the whole population counts.
    async fn counts_excluding(&self, excluding: Option<&UserId>) -> AppResult<ItemCounts>;

    /// Looks up a single stored fact, with the `recorded_at` of its first report
    async fn find(&self, user_id: &UserId, item_id: &ItemId) -> AppResult<Option<Interaction>>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
