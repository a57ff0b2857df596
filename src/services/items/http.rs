/// Item store backed by the content service's HTTP API
///
/// Batch lookup goes through a single request:
/// `GET {base_url}/articles/batch?ids=a&ids=b&ids=c` → `{ "articles": [...] }`.
/// Each id travels as its own `ids` pair, so ids may contain any character.
/// The content service returns whatever subset of the ids it still has.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::ItemStore;
use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemId},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    articles: Vec<Item>,
}

#[derive(Clone)]
pub struct HttpItemStore {
    http_client: HttpClient,
    base_url: String,
}

impl HttpItemStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn batch_url(&self) -> String {
        format!("{}/articles/batch", self.base_url)
    }

    fn ids_query(ids: &[ItemId]) -> Vec<(&'static str, &str)> {
        ids.iter().map(|id| ("ids", id.as_str())).collect()
    }
}

#[async_trait::async_trait]
impl ItemStore for HttpItemStore {
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    async fn fetch_by_ids(&self, ids: &[ItemId]) -> AppResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http_client
            .get(self.batch_url())
            .query(&Self::ids_query(ids))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Item store request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Item store returned status {}: {}",
                status, body
            )));
        }

        let batch: BatchResponse = response.json().await?;

        tracing::debug!(
            requested = ids.len(),
            returned = batch.articles.len(),
            "Fetched items from content service"
        );

        Ok(batch.articles)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
