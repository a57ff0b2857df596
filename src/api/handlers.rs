use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Interaction, Item, ItemId, RecordOutcome, UserId},
};

use super::AppState;

// Request/Response types

/// Report body, read leniently
///
/// Ids may arrive as JSON strings or numbers. A field of any other shape, a
/// `null` or non-JSON body, or no body at all leaves the id missing.
#[derive(Debug, Default, PartialEq)]
pub struct ReportInteractionRequest {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
}

impl ReportInteractionRequest {
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        Self {
            user_id: id_field(&value, "user_id"),
            item_id: id_field(&value, "item_id"),
        }
    }
}

fn id_field(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct ReportInteractionResponse {
    pub outcome: RecordOutcome,
}

#[derive(Debug, Deserialize)]
pub struct InteractionQuery {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub interaction: Interaction,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub articles: Vec<Item>,
    pub articles_count: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Records a user/item interaction
///
/// Fire-and-forget: always answers 202. Unusable bodies, missing ids and store
/// failures all come back as `ignored`; the failure is only logged.
pub async fn report_interaction(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> (StatusCode, Json<ReportInteractionResponse>) {
    let request = ReportInteractionRequest::from_body(&body);

    let outcome = match state
        .engine
        .report_interaction(request.user_id.as_deref(), request.item_id.as_deref())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Failed to record interaction"
            );
            RecordOutcome::Ignored
        }
    };

    (
        StatusCode::ACCEPTED,
        Json(ReportInteractionResponse { outcome }),
    )
}

/// Reads back one stored interaction for auditing
pub async fn get_interaction(
    State(state): State<AppState>,
    Query(query): Query<InteractionQuery>,
) -> AppResult<Json<InteractionResponse>> {
    let user_id = query
        .user_id
        .and_then(UserId::parse)
        .ok_or_else(|| AppError::InvalidInput("user_id is required".to_string()))?;
    let item_id = query
        .item_id
        .and_then(ItemId::parse)
        .ok_or_else(|| AppError::InvalidInput("item_id is required".to_string()))?;

    let interaction = state
        .engine
        .find_interaction(&user_id, &item_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("no interaction for {} and {}", user_id, item_id))
        })?;

    Ok(Json(InteractionResponse { interaction }))
}

/// Returns popular articles the user has not interacted with yet
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        user_id = ?query.user_id,
        limit = ?query.limit,
        "Processing recommendation request"
    );

    let articles = state
        .engine
        .get_recommendations(query.user_id.as_deref(), query.limit)
        .await?;

    Ok(Json(RecommendationResponse {
        articles_count: articles.len(),
        articles,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_become_strings() {
        let request = ReportInteractionRequest::from_body(br#"{"user_id":7,"item_id":"1"}"#);
        assert_eq!(request.user_id.as_deref(), Some("7"));
        assert_eq!(request.item_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_unusable_bodies_leave_ids_missing() {
        for body in [&b""[..], b"null", b"not json", b"[1,2]", br#"{"user_id":true,"item_id":{}}"#] {
            assert_eq!(
                ReportInteractionRequest::from_body(body),
                ReportInteractionRequest::default()
            );
        }
    }
}
