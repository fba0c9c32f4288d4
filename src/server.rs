//! 推荐查询 HTTP 服务（feature = "server"）
//!
//! - GET /recommendation?event_title=..&max_results=..  → Recommendation 数组
//! - GET /health → OK
//! - GET /metrics → 检索计数（Prometheus 文本）

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::integrations::{IntegrationError, RecommendationSource};
use crate::observability::SearchMetrics;
use crate::ranking::Recommendation;
use crate::tools::recommend::MAX_RESULTS_LIMIT;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

#[derive(Clone)]
pub struct ServerState {
    pub source: Arc<dyn RecommendationSource>,
    pub metrics: Arc<SearchMetrics>,
    pub default_max_results: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub event_title: String,
    pub max_results: Option<i64>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/recommendation", get(recommendation))
        .route("/health", get(|| async { "OK" }))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn recommendation(
    State(state): State<ServerState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let Query(q) = query.map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.body_text()))?;

    let max = q.max_results.unwrap_or(state.default_max_results as i64);
    if !(1..=MAX_RESULTS_LIMIT as i64).contains(&max) {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("max_results must be between 1 and {MAX_RESULTS_LIMIT}"),
        ));
    }

    tracing::info!(event_title = %q.event_title, max, "recommendation request");
    match state.source.top_recommendations(&q.event_title, max as usize).await {
        Ok(recs) => Ok(Json(recs)),
        Err(IntegrationError::Upstream { status, reason, .. }) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Err(api_error(
                code,
                format!(
                    "GitHub API error: {} - {}. Check server logs for details.",
                    status, reason
                ),
            ))
        }
        Err(e) => {
            tracing::error!("recommendation lookup failed: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
