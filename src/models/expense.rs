use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Expense — a persisted ledger row
// ---------------------------------------------------------------------------

/// One expense as stored, joined with its category name where available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: f64,
    pub description: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form; the unit of aggregation.
    pub date: String,
    pub payment_method: Option<String>,
    /// Comma-separated free-form tags. Carried, never aggregated.
    pub tags: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Resolved category name; absent on rows returned straight from
    /// INSERT/UPDATE RETURNING (no join there).
    #[serde(default)]
    pub category_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Payload for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub date: String,
    pub payment_method: Option<String>,
    pub tags: Option<String>,
}

/// Partial update; `None` fields leave their columns untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub tags: Option<String>,
}

/// Structured predicate object for expense retrieval.
///
/// Each present field contributes one conjunctive condition; the store
/// translates the whole filter into parameterized SQL. Date bounds are
/// inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category_id: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}
