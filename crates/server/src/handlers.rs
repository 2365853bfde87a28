// ABOUTME: Request handlers for the news aggregation endpoints.
// ABOUTME: GET /news runs one aggregation pass; GET /health reports liveness.

use axum::{extract::State, response::IntoResponse, Json};
use newsdesk_scrape::NewsItem;
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// Run one aggregation pass and return the merged item list.
///
/// Always 200 with a (possibly empty) JSON array, including when every
/// source failed this pass; only configuration problems produce an error
/// response.
pub async fn get_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, AppError> {
    let items = state.aggregator.aggregate(&state.request).await?;
    info!(count = items.len(), "served /news");
    Ok(Json(items))
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
