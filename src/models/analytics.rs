//! Derived analytics types. Computed fresh per call from the current
//! expense snapshot, serialized, and discarded — never persisted.

use serde::{Deserialize, Serialize};

/// Aggregate view of a (possibly date-filtered) expense set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    /// Sum of `amount` over the filtered set; 0 when empty.
    pub total_spent: f64,
    pub expense_count: i64,
    /// Per-category aggregates, ordered by descending amount. Tie order
    /// between equal amounts follows grouping order and is not significant.
    pub category_breakdown: Vec<CategoryBreakdown>,
    /// `total_spent` divided by the inclusive day count between the earliest
    /// and latest expense actually present; 0 when the set is empty.
    pub daily_average: f64,
    pub date_range: DateRange,
}

/// One breakdown group: all expenses sharing a `category_id` (the null
/// group carries the name `"Uncategorized"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: Option<i64>,
    pub category_name: String,
    pub amount: f64,
    pub percentage: f64,
    pub count: i64,
}

/// Effective bounds of a summary. Explicit filter bounds take precedence;
/// otherwise the min/max date present in the data; empty strings when the
/// set is empty and no bound was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// One point of a sparse daily spending series: dates with no expenses
/// produce no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: f64,
}
