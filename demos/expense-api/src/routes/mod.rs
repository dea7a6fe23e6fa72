pub mod analytics;
pub mod categories;
pub mod expenses;

use axum::response::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
