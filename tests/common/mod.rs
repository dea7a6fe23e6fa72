//! Shared test fixtures for the ledgerkit integration tests.
//!
//! Provides `setup_ledger()` which creates an in-memory client with the
//! bootstrapped schema, plus small helpers for seeding categories and
//! expenses through the public API.

use ledgerkit::models::{Category, Expense, NewCategory, NewExpense};
use ledgerkit::{LedgerKit, UserScope};

/// Create an in-memory client. The schema bootstrap seeds the demo user
/// and the system category set.
pub fn setup_ledger() -> LedgerKit {
    LedgerKit::builder().in_memory().build().unwrap()
}

/// Create a user-defined category and return the stored row.
pub fn add_category(ledger: &LedgerKit, scope: UserScope, name: &str) -> Category {
    ledger
        .categories(scope)
        .create(&NewCategory {
            name: name.to_string(),
            color: None,
            icon: None,
        })
        .unwrap()
}

/// Create an expense with the fields the aggregation logic cares about.
pub fn add_expense(
    ledger: &LedgerKit,
    scope: UserScope,
    amount: f64,
    date: &str,
    category_id: Option<i64>,
) -> Expense {
    ledger
        .expenses(scope)
        .create(&NewExpense {
            amount,
            category_id,
            description: None,
            date: date.to_string(),
            payment_method: None,
            tags: None,
        })
        .unwrap()
}

/// A date `days_ago` days before today, in `YYYY-MM-DD` form. Trend queries
/// window against the current date, so their fixtures are relative.
pub fn days_ago(days: i64) -> String {
    (chrono::Local::now().date_naive() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
