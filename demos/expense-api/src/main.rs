mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

#[tokio::main]
async fn main() {
    eprintln!("Opening ledger database...");
    let ledger = ledgerkit::AsyncLedgerKit::builder()
        .build()
        .await
        .expect("Failed to open ledger database");
    eprintln!("Ledger ready.");

    let state = Arc::new(AppState { ledger });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/expenses", get(routes::expenses::list_expenses))
        .route("/api/expenses", post(routes::expenses::create_expense))
        .route("/api/expenses/{id}", get(routes::expenses::get_expense))
        .route("/api/expenses/{id}", put(routes::expenses::update_expense))
        .route("/api/expenses/{id}", delete(routes::expenses::delete_expense))
        .route("/api/categories", get(routes::categories::list_categories))
        .route("/api/categories", post(routes::categories::create_category))
        .route("/api/categories/{id}", get(routes::categories::get_category))
        .route("/api/categories/{id}", put(routes::categories::update_category))
        .route(
            "/api/categories/{id}",
            delete(routes::categories::delete_category),
        )
        .route("/api/analytics/summary", get(routes::analytics::get_summary))
        .route("/api/analytics/trends", get(routes::analytics::get_trends))
        .route(
            "/api/analytics/category-trends/{category_id}",
            get(routes::analytics::get_category_trends),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3001";
    eprintln!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
