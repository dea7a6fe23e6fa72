//! Query modules for the ledger.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection), is bound to a
//! [`UserScope`](crate::UserScope), and exposes methods returning
//! `Result<T>` with typed payloads.

pub mod analytics;
pub mod categories;
pub mod expenses;

pub use analytics::AnalyticsQuery;
pub use categories::CategoryQuery;
pub use expenses::ExpenseQuery;

use chrono::NaiveDate;

use crate::error::{LedgerError, Result};

/// Validate a `YYYY-MM-DD` date string. Malformed input is rejected with
/// `InvalidParameter` before any SQL runs; it is never coerced.
pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        LedgerError::InvalidParameter(format!(
            "{} must be a YYYY-MM-DD date, got '{}'",
            field, value
        ))
    })
}
