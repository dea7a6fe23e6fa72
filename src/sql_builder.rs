//! SQL builders with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! [`SqlBuilder`] covers SELECT queries; [`UpdateBuilder`] covers partial
//! UPDATE statements where only the provided columns are touched.
//!
//! # Example
//!
//! ```rust
//! use ledgerkit::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("expenses")
//!     .where_eq("user_id", "1")
//!     .where_gte("date", "2024-01-01")
//!     .order_by(&["date DESC"])
//!     .limit(10)
//!     .build();
//! ```

/// Builds parameterized SELECT queries safely.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<String>,
    group_by_cols: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table or view.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a JOIN clause.
    ///
    /// The clause should be a full JOIN expression, e.g.
    /// `"LEFT JOIN categories c ON e.category_id = c.id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    ///
    /// The caller provides a condition using `?` for each parameter value.
    /// Parameters are appended in order.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add a case-insensitive LIKE condition.
    ///
    /// Generates: `LOWER({column}) LIKE LOWER(?)`
    pub fn where_like(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("LOWER({}) LIKE LOWER(?)", column));
        self.params.push(value.to_string());
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a greater-than-or-equal condition: `{column} >= ?`.
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} >= ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a less-than-or-equal condition: `{column} <= ?`.
    pub fn where_lte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} <= ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols
            .extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add ORDER BY clauses (e.g. `"date DESC"`, `"name ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    ///
    /// Returns a tuple of `(sql_string, params_list)` ready for execution.
    pub fn build(&self) -> (String, Vec<String>) {
        let cols = self.select_cols.join(", ");
        let mut parts = vec![
            format!("SELECT {}", cols),
            format!("FROM {}", self.from_table),
        ];

        for j in &self.joins {
            parts.push(j.clone());
        }

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}

// ---------------------------------------------------------------------------
// UpdateBuilder
// ---------------------------------------------------------------------------

/// Builds parameterized partial UPDATE statements.
///
/// Only columns added via [`set`](UpdateBuilder::set) / [`set_raw`](UpdateBuilder::set_raw)
/// appear in the SET clause, so absent input fields leave their columns
/// untouched. [`is_empty`](UpdateBuilder::is_empty) lets callers skip the
/// statement entirely when no field was provided.
pub struct UpdateBuilder {
    table: String,
    assignments: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<String>,
    returning_cols: Vec<String>,
}

impl UpdateBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            assignments: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            returning_cols: Vec::new(),
        }
    }

    /// Add a parameterized assignment. The expression must contain exactly
    /// one `?` placeholder, e.g. `"amount = CAST(? AS DOUBLE)"`.
    pub fn set(&mut self, assignment: &str, value: &str) -> &mut Self {
        self.assignments.push(assignment.to_string());
        self.params.push(value.to_string());
        self
    }

    /// Add a literal assignment with no parameter, e.g.
    /// `"updated_at = CURRENT_TIMESTAMP"`.
    pub fn set_raw(&mut self, assignment: &str) -> &mut Self {
        self.assignments.push(assignment.to_string());
        self
    }

    /// Add an equality condition to the WHERE clause: `{column} = ?`.
    ///
    /// WHERE params are emitted after all SET params.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Add a WHERE condition with no parameters, e.g. `"is_system = false"`.
    pub fn where_raw(&mut self, condition: &str) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self
    }

    /// Add a RETURNING clause.
    pub fn returning(&mut self, cols: &[&str]) -> &mut Self {
        self.returning_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// True when no assignment has been added.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = vec![
            format!("UPDATE {}", self.table),
            format!("SET {}", self.assignments.join(", ")),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.returning_cols.is_empty() {
            parts.push(format!("RETURNING {}", self.returning_cols.join(", ")));
        }

        (parts.join("\n"), self.params.clone())
    }
}
