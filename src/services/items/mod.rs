/// Access to the content service that owns the articles
///
/// The recommendation engine only ever needs one capability from it: fetch a
/// batch of items by id. Nothing is promised about the order of the returned
/// items, and ids that no longer exist are simply left out of the response.
use crate::{
    error::AppResult,
    models::{Item, ItemId},
};

pub mod http;
pub mod memory;

pub use http::HttpItemStore;
pub use memory::MemoryItemStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetches the items whose id is in `ids`, in no particular order
    async fn fetch_by_ids(&self, ids: &[ItemId]) -> AppResult<Vec<Item>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
