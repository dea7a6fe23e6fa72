use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use ledgerkit::UserScope;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SummaryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct TrendParams {
    pub days: Option<i64>,
}

/// GET /api/analytics/summary?start_date=2024-01-01&end_date=2024-01-31
///
/// Spending summary over an optional inclusive date range. Malformed dates
/// are rejected with 400 before any aggregation runs.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Value>, AppError> {
    let summary = state
        .ledger
        .run(move |l| {
            l.analytics(UserScope::default())
                .summary(params.start_date.as_deref(), params.end_date.as_deref())
        })
        .await?;

    Ok(Json(json!({ "data": summary })))
}

/// GET /api/analytics/trends?days=30
///
/// Daily spending totals over a trailing window. Non-numeric `days` is
/// rejected by the typed extractor.
pub async fn get_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Value>, AppError> {
    let trends = state
        .ledger
        .run(move |l| l.analytics(UserScope::default()).trends(params.days))
        .await?;

    let count = trends.len();
    Ok(Json(json!({ "data": trends, "count": count })))
}

/// GET /api/analytics/category-trends/:category_id?days=30
///
/// Like trends, restricted to one category; an unknown category yields an
/// empty series.
pub async fn get_category_trends(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Value>, AppError> {
    let trends = state
        .ledger
        .run(move |l| {
            l.analytics(UserScope::default())
                .category_trends(category_id, params.days)
        })
        .await?;

    let count = trends.len();
    Ok(Json(json!({ "data": trends, "count": count })))
}
