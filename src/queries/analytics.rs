//! Analytics engine: summary, trend and category-breakdown aggregation
//! over the expense snapshot.
//!
//! All three operations are read-only and stateless per call; every derived
//! value is recomputed from the rows currently in the store. An empty
//! snapshot is a normal zero-valued result, never an error, and storage
//! failures propagate unchanged (no partial summaries).

use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

use crate::config::DEFAULT_TREND_WINDOW_DAYS;
use crate::error::Result;
use crate::models::{CategoryBreakdown, DateRange, SpendingSummary, TrendPoint};
use crate::sql_builder::SqlBuilder;
use crate::UserScope;

use super::parse_date;

#[derive(Deserialize)]
struct BreakdownRow {
    category_id: Option<i64>,
    category_name: String,
    amount: f64,
    count: i64,
}

/// Read-only aggregation interface, scoped to one user.
pub struct AnalyticsQuery<'a> {
    conn: &'a crate::connection::Connection,
    scope: UserScope,
}

impl<'a> AnalyticsQuery<'a> {
    /// Create a new `AnalyticsQuery` bound to the given connection and scope.
    pub fn new(conn: &'a crate::connection::Connection, scope: UserScope) -> Self {
        Self { conn, scope }
    }

    /// Compute the spending summary over an optional inclusive date range.
    ///
    /// Groups expenses by category (null category grouping under
    /// `"Uncategorized"`), orders groups by descending amount, and derives
    /// the daily average from the span of dates actually present in the
    /// data (floored at one day), not from the requested window.
    pub fn summary(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<SpendingSummary> {
        if let Some(start) = start_date {
            parse_date(start, "start_date")?;
        }
        if let Some(end) = end_date {
            parse_date(end, "end_date")?;
        }

        // Total and count over the filtered set.
        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&["COALESCE(SUM(e.amount), 0) AS total", "COUNT(*) AS cnt"]);
        self.apply_range(&mut qb, start_date, end_date);
        let (sql, params) = qb.build();
        let totals = self.conn.execute(&sql, &params)?;
        let (total_spent, expense_count) = totals
            .first()
            .map(|row| {
                (
                    row.get("total").and_then(|v| v.as_f64()).unwrap_or(0.0),
                    row.get("cnt").and_then(|v| v.as_i64()).unwrap_or(0),
                )
            })
            .unwrap_or((0.0, 0));

        // Per-category groups, largest first.
        let name_col = format!(
            "COALESCE(c.name, '{}') AS category_name",
            crate::config::UNCATEGORIZED
        );
        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&[
            "e.category_id AS category_id",
            &name_col,
            "SUM(e.amount) AS amount",
            "COUNT(*) AS count",
        ])
        .join("LEFT JOIN categories c ON e.category_id = c.id AND c.user_id = e.user_id")
        .group_by(&["e.category_id", "c.name"])
        .order_by(&["amount DESC"]);
        self.apply_range(&mut qb, start_date, end_date);
        let (sql, params) = qb.build();
        let groups: Vec<BreakdownRow> = self.conn.execute_into(&sql, &params)?;

        let category_breakdown: Vec<CategoryBreakdown> = groups
            .into_iter()
            .map(|g| CategoryBreakdown {
                category_id: g.category_id,
                category_name: g.category_name,
                amount: g.amount,
                percentage: if total_spent > 0.0 {
                    g.amount / total_spent * 100.0
                } else {
                    0.0
                },
                count: g.count,
            })
            .collect();

        // Span of dates actually present, for the daily average.
        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&[
            "CAST(MIN(e.date) AS VARCHAR) AS min_date",
            "CAST(MAX(e.date) AS VARCHAR) AS max_date",
        ]);
        self.apply_range(&mut qb, start_date, end_date);
        let (sql, params) = qb.build();
        let bounds = self.conn.execute(&sql, &params)?;
        let (min_date, max_date) = bounds
            .first()
            .map(|row| {
                (
                    row.get("min_date")
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                    row.get("max_date")
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                )
            })
            .unwrap_or((None, None));

        let daily_average = match (min_date.as_deref(), max_date.as_deref()) {
            (Some(min), Some(max)) => total_spent / day_span(min, max) as f64,
            _ => 0.0,
        };

        let date_range = DateRange {
            start: start_date
                .map(str::to_string)
                .or(min_date)
                .unwrap_or_default(),
            end: end_date.map(str::to_string).or(max_date).unwrap_or_default(),
        };

        Ok(SpendingSummary {
            total_spent,
            expense_count,
            category_breakdown,
            daily_average,
            date_range,
        })
    }

    /// Daily spending totals over a trailing window, ascending by date.
    ///
    /// The series is sparse: dates with no expenses produce no entry.
    /// Defaults to a 30-day window; a zero or negative window simply moves
    /// the cutoff forward and is accepted as-is.
    pub fn trends(&self, window_days: Option<i64>) -> Result<Vec<TrendPoint>> {
        self.trend_series(None, window_days)
    }

    /// Like [`trends`](Self::trends), restricted to a single category.
    /// An unknown or empty category yields an empty series.
    pub fn category_trends(
        &self,
        category_id: i64,
        window_days: Option<i64>,
    ) -> Result<Vec<TrendPoint>> {
        self.trend_series(Some(category_id), window_days)
    }

    fn trend_series(
        &self,
        category_id: Option<i64>,
        window_days: Option<i64>,
    ) -> Result<Vec<TrendPoint>> {
        let window = window_days.unwrap_or(DEFAULT_TREND_WINDOW_DAYS);
        let cutoff = Local::now().date_naive() - Duration::days(window);

        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&["CAST(e.date AS VARCHAR) AS date", "SUM(e.amount) AS amount"])
            .where_eq("e.user_id", &self.scope.id().to_string())
            .where_clause(
                "e.date >= CAST(? AS DATE)",
                &[cutoff.format("%Y-%m-%d").to_string().as_str()],
            )
            .group_by(&["e.date"])
            .order_by(&["e.date ASC"]);

        if let Some(id) = category_id {
            qb.where_eq("e.category_id", &id.to_string());
        }

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    fn apply_range(&self, qb: &mut SqlBuilder, start_date: Option<&str>, end_date: Option<&str>) {
        qb.where_eq("e.user_id", &self.scope.id().to_string());
        if let Some(start) = start_date {
            qb.where_clause("e.date >= CAST(? AS DATE)", &[start]);
        }
        if let Some(end) = end_date {
            qb.where_clause("e.date <= CAST(? AS DATE)", &[end]);
        }
    }
}

/// Inclusive day count between two `YYYY-MM-DD` dates, floored at 1 so a
/// single-day snapshot divides by one.
fn day_span(min: &str, max: &str) -> i64 {
    let parsed = (
        NaiveDate::parse_from_str(min, "%Y-%m-%d"),
        NaiveDate::parse_from_str(max, "%Y-%m-%d"),
    );
    match parsed {
        (Ok(min), Ok(max)) => (max - min).num_days().saturating_add(1).max(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::day_span;

    #[test]
    fn day_span_is_inclusive() {
        assert_eq!(day_span("2024-01-01", "2024-01-03"), 3);
    }

    #[test]
    fn day_span_single_day_is_one() {
        assert_eq!(day_span("2024-01-01", "2024-01-01"), 1);
    }

    #[test]
    fn day_span_never_below_one() {
        assert_eq!(day_span("2024-01-05", "2024-01-01"), 1);
    }
}
