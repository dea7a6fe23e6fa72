use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ledgerkit::LedgerError> for AppError {
    fn from(e: ledgerkit::LedgerError) -> Self {
        match &e {
            ledgerkit::LedgerError::NotFound(msg) => AppError::not_found(msg.clone()),
            ledgerkit::LedgerError::InvalidParameter(msg) => AppError::bad_request(msg.clone()),
            ledgerkit::LedgerError::Conflict(msg) => AppError::conflict(msg.clone()),
            _ => {
                // Log the cause; the client only sees a generic message.
                eprintln!("ledger error: {e}");
                AppError::internal("Internal server error")
            }
        }
    }
}
