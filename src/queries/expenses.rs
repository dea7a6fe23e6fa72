//! Expense store: filtered retrieval and point CRUD against the
//! `expenses` table.

use crate::error::{LedgerError, Result};
use crate::models::{Expense, ExpenseFilter, ExpenseUpdate, NewExpense};
use crate::sql_builder::{SqlBuilder, UpdateBuilder};
use crate::UserScope;

use super::parse_date;

/// Query interface for expense rows, scoped to one user.
pub struct ExpenseQuery<'a> {
    conn: &'a crate::connection::Connection,
    scope: UserScope,
}

impl<'a> ExpenseQuery<'a> {
    /// Create a new `ExpenseQuery` bound to the given connection and scope.
    pub fn new(conn: &'a crate::connection::Connection, scope: UserScope) -> Self {
        Self { conn, scope }
    }

    /// List expenses matching the filter, newest first.
    ///
    /// Every present filter field contributes one conjunctive condition;
    /// rows carry the resolved category name via a LEFT JOIN. The join is
    /// restricted to the row's own user so a name never resolves across
    /// scopes.
    pub fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&["e.*", "c.name AS category_name"])
            .join("LEFT JOIN categories c ON e.category_id = c.id AND c.user_id = e.user_id")
            .where_eq("e.user_id", &self.scope.id().to_string())
            .order_by(&["e.date DESC", "e.created_at DESC"]);

        self.apply_filter(&mut qb, filter)?;

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// Get a single expense by id.
    pub fn get(&self, id: i64) -> Result<Option<Expense>> {
        let (sql, params) = SqlBuilder::new("expenses e")
            .select(&["e.*", "c.name AS category_name"])
            .join("LEFT JOIN categories c ON e.category_id = c.id AND c.user_id = e.user_id")
            .where_eq("e.id", &id.to_string())
            .where_eq("e.user_id", &self.scope.id().to_string())
            .limit(1)
            .build();

        let rows: Vec<Expense> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next())
    }

    /// Insert a new expense and return the stored row.
    ///
    /// Rejects non-positive amounts, malformed dates and category ids that
    /// do not exist in this scope with `InvalidParameter`.
    pub fn create(&self, input: &NewExpense) -> Result<Expense> {
        if input.amount <= 0.0 || !input.amount.is_finite() {
            return Err(LedgerError::InvalidParameter(
                "amount must be greater than 0".to_string(),
            ));
        }
        parse_date(&input.date, "date")?;
        if let Some(category_id) = input.category_id {
            self.assert_category_in_scope(category_id)?;
        }

        // Only provided columns appear in the statement; the rest default
        // to NULL.
        let mut cols = vec!["user_id", "amount", "date"];
        let mut exprs = vec!["?", "CAST(? AS DOUBLE)", "CAST(? AS DATE)"];
        let mut params = vec![
            self.scope.id().to_string(),
            input.amount.to_string(),
            input.date.clone(),
        ];

        if let Some(category_id) = input.category_id {
            cols.push("category_id");
            exprs.push("?");
            params.push(category_id.to_string());
        }
        if let Some(ref description) = input.description {
            cols.push("description");
            exprs.push("?");
            params.push(description.clone());
        }
        if let Some(ref payment_method) = input.payment_method {
            cols.push("payment_method");
            exprs.push("?");
            params.push(payment_method.clone());
        }
        if let Some(ref tags) = input.tags {
            cols.push("tags");
            exprs.push("?");
            params.push(tags.clone());
        }

        let sql = format!(
            "INSERT INTO expenses ({}) VALUES ({}) RETURNING *",
            cols.join(", "),
            exprs.join(", ")
        );

        let rows: Vec<Expense> = self.conn.execute_into(&sql, &params)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| LedgerError::NotFound("inserted expense was not returned".to_string()))
    }

    /// Apply a partial update and return the updated row.
    ///
    /// `None` fields leave their columns untouched; an update with no
    /// fields set is a no-op read. Returns `None` when the id does not
    /// exist in this scope.
    pub fn update(&self, id: i64, input: &ExpenseUpdate) -> Result<Option<Expense>> {
        let mut ub = UpdateBuilder::new("expenses");

        if let Some(amount) = input.amount {
            if amount <= 0.0 || !amount.is_finite() {
                return Err(LedgerError::InvalidParameter(
                    "amount must be greater than 0".to_string(),
                ));
            }
            ub.set("amount = CAST(? AS DOUBLE)", &amount.to_string());
        }
        if let Some(category_id) = input.category_id {
            self.assert_category_in_scope(category_id)?;
            ub.set("category_id = ?", &category_id.to_string());
        }
        if let Some(ref description) = input.description {
            ub.set("description = ?", description);
        }
        if let Some(ref date) = input.date {
            parse_date(date, "date")?;
            ub.set("date = CAST(? AS DATE)", date);
        }
        if let Some(ref payment_method) = input.payment_method {
            ub.set("payment_method = ?", payment_method);
        }
        if let Some(ref tags) = input.tags {
            ub.set("tags = ?", tags);
        }

        if ub.is_empty() {
            return self.get(id);
        }

        ub.set_raw("updated_at = CURRENT_TIMESTAMP")
            .where_eq("id", &id.to_string())
            .where_eq("user_id", &self.scope.id().to_string())
            .returning(&["*"]);

        let (sql, params) = ub.build();
        let rows: Vec<Expense> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next())
    }

    /// Delete an expense. Returns `true` when a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute_write(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            &[id.to_string(), self.scope.id().to_string()],
        )?;
        Ok(changed > 0)
    }

    /// Count expenses matching the filter.
    pub fn count(&self, filter: &ExpenseFilter) -> Result<i64> {
        let mut qb = SqlBuilder::new("expenses e");
        qb.select(&["COUNT(*) AS cnt"])
            .where_eq("e.user_id", &self.scope.id().to_string());

        self.apply_filter(&mut qb, filter)?;

        let (sql, params) = qb.build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }

    /// The schema declares no foreign keys, so referential integrity is
    /// enforced here: a referenced category must exist under the same user.
    fn assert_category_in_scope(&self, category_id: i64) -> Result<()> {
        let found = self
            .conn
            .execute_scalar(
                "SELECT COUNT(*) FROM categories WHERE id = ? AND user_id = ?",
                &[category_id.to_string(), self.scope.id().to_string()],
            )?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if found == 0 {
            return Err(LedgerError::InvalidParameter(format!(
                "unknown category id {}",
                category_id
            )));
        }
        Ok(())
    }

    fn apply_filter(&self, qb: &mut SqlBuilder, filter: &ExpenseFilter) -> Result<()> {
        if let Some(ref start) = filter.start_date {
            parse_date(start, "start_date")?;
            qb.where_clause("e.date >= CAST(? AS DATE)", &[start.as_str()]);
        }
        if let Some(ref end) = filter.end_date {
            parse_date(end, "end_date")?;
            qb.where_clause("e.date <= CAST(? AS DATE)", &[end.as_str()]);
        }
        if let Some(category_id) = filter.category_id {
            qb.where_eq("e.category_id", &category_id.to_string());
        }
        if let Some(min) = filter.min_amount {
            qb.where_clause("e.amount >= CAST(? AS DOUBLE)", &[min.to_string().as_str()]);
        }
        if let Some(max) = filter.max_amount {
            qb.where_clause("e.amount <= CAST(? AS DOUBLE)", &[max.to_string().as_str()]);
        }
        Ok(())
    }
}
