use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use ledgerkit::models::{ExpenseFilter, ExpenseUpdate, NewExpense};
use ledgerkit::UserScope;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListExpensesParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category_id: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

/// GET /api/expenses?start_date=2024-01-01&category_id=3
///
/// List expenses matching the optional filters, newest first. Non-numeric
/// ids/amounts are rejected by the typed extractor before reaching the
/// store.
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExpensesParams>,
) -> Result<Json<Value>, AppError> {
    let filter = ExpenseFilter {
        start_date: params.start_date,
        end_date: params.end_date,
        category_id: params.category_id,
        min_amount: params.min_amount,
        max_amount: params.max_amount,
    };

    let expenses = state
        .ledger
        .run(move |l| l.expenses(UserScope::default()).list(&filter))
        .await?;

    let count = expenses.len();
    Ok(Json(json!({ "data": expenses, "count": count })))
}

/// GET /api/expenses/:id
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let expense = state
        .ledger
        .run(move |l| l.expenses(UserScope::default()).get(id))
        .await?;

    match expense {
        Some(e) => Ok(Json(json!({ "data": e }))),
        None => Err(AppError::not_found("Expense not found")),
    }
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewExpense>,
) -> Result<(axum::http::StatusCode, Json<Value>), AppError> {
    let expense = state
        .ledger
        .run(move |l| l.expenses(UserScope::default()).create(&input))
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({ "data": expense })),
    ))
}

/// PUT /api/expenses/:id
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<ExpenseUpdate>,
) -> Result<Json<Value>, AppError> {
    let expense = state
        .ledger
        .run(move |l| l.expenses(UserScope::default()).update(id, &input))
        .await?;

    match expense {
        Some(e) => Ok(Json(json!({ "data": e }))),
        None => Err(AppError::not_found("Expense not found")),
    }
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .ledger
        .run(move |l| l.expenses(UserScope::default()).delete(id))
        .await?;

    if deleted {
        Ok(Json(json!({ "message": "Expense deleted" })))
    } else {
        Err(AppError::not_found("Expense not found"))
    }
}
