/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async ledger client. Handles dispatching blocking DuckDB
    /// operations to a thread pool internally.
    pub ledger: ledgerkit::AsyncLedgerKit,
}
