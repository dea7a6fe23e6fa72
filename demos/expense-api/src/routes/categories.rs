use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{json, Value};

use ledgerkit::models::{CategoryUpdate, NewCategory};
use ledgerkit::UserScope;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let categories = state
        .ledger
        .run(|l| l.categories(UserScope::default()).list())
        .await?;

    let count = categories.len();
    Ok(Json(json!({ "data": categories, "count": count })))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let category = state
        .ledger
        .run(move |l| l.categories(UserScope::default()).get(id))
        .await?;

    match category {
        Some(c) => Ok(Json(json!({ "data": c }))),
        None => Err(AppError::not_found("Category not found")),
    }
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewCategory>,
) -> Result<(axum::http::StatusCode, Json<Value>), AppError> {
    let category = state
        .ledger
        .run(move |l| l.categories(UserScope::default()).create(&input))
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({ "data": category })),
    ))
}

/// PUT /api/categories/:id
///
/// System categories cannot be modified; attempting to do so reads as a
/// missing category.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryUpdate>,
) -> Result<Json<Value>, AppError> {
    let category = state
        .ledger
        .run(move |l| l.categories(UserScope::default()).update(id, &input))
        .await?;

    match category {
        Some(c) => Ok(Json(json!({ "data": c }))),
        None => Err(AppError::not_found(
            "Category not found or is a system category",
        )),
    }
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .ledger
        .run(move |l| l.categories(UserScope::default()).delete(id))
        .await?;

    if deleted {
        Ok(Json(json!({ "message": "Category deleted" })))
    } else {
        Err(AppError::not_found(
            "Category not found or is a system category",
        ))
    }
}
