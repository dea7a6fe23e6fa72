//! Category store. Distinguishes seeded system categories (immutable)
//! from user-defined ones.

use crate::error::{LedgerError, Result};
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::sql_builder::{SqlBuilder, UpdateBuilder};
use crate::UserScope;

/// Query interface for categories, scoped to one user.
pub struct CategoryQuery<'a> {
    conn: &'a crate::connection::Connection,
    scope: UserScope,
}

impl<'a> CategoryQuery<'a> {
    /// Create a new `CategoryQuery` bound to the given connection and scope.
    pub fn new(conn: &'a crate::connection::Connection, scope: UserScope) -> Self {
        Self { conn, scope }
    }

    /// List all categories, system ones first, then alphabetical.
    pub fn list(&self) -> Result<Vec<Category>> {
        let (sql, params) = SqlBuilder::new("categories")
            .where_eq("user_id", &self.scope.id().to_string())
            .order_by(&["is_system DESC", "name ASC"])
            .build();

        self.conn.execute_into(&sql, &params)
    }

    /// Get a single category by id.
    pub fn get(&self, id: i64) -> Result<Option<Category>> {
        let (sql, params) = SqlBuilder::new("categories")
            .where_eq("id", &id.to_string())
            .where_eq("user_id", &self.scope.id().to_string())
            .limit(1)
            .build();

        let rows: Vec<Category> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().next())
    }

    /// Create a user-defined category and return the stored row.
    ///
    /// Blank names are rejected with `InvalidParameter`; a duplicate name
    /// within the scope surfaces as `Conflict`.
    pub fn create(&self, input: &NewCategory) -> Result<Category> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidParameter(
                "category name is required".to_string(),
            ));
        }

        let mut cols = vec!["user_id", "name", "is_system"];
        let mut exprs = vec!["?", "?", "false"];
        let mut params = vec![self.scope.id().to_string(), name.to_string()];

        if let Some(ref color) = input.color {
            cols.push("color");
            exprs.push("?");
            params.push(color.clone());
        }
        if let Some(ref icon) = input.icon {
            cols.push("icon");
            exprs.push("?");
            params.push(icon.clone());
        }

        let sql = format!(
            "INSERT INTO categories ({}) VALUES ({}) RETURNING *",
            cols.join(", "),
            exprs.join(", ")
        );

        match self.conn.execute_into::<Category>(&sql, &params) {
            Ok(rows) => rows.into_iter().next().ok_or_else(|| {
                LedgerError::NotFound("inserted category was not returned".to_string())
            }),
            Err(LedgerError::DuckDb(e)) if is_unique_violation(&e) => Err(LedgerError::Conflict(
                format!("category name '{}' already exists", name),
            )),
            Err(e) => Err(e),
        }
    }

    /// Apply a partial update and return the updated row.
    ///
    /// System categories are never touched; updating one behaves like a
    /// missing id and returns `None`.
    pub fn update(&self, id: i64, input: &CategoryUpdate) -> Result<Option<Category>> {
        let mut ub = UpdateBuilder::new("categories");

        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(LedgerError::InvalidParameter(
                    "category name is required".to_string(),
                ));
            }
            ub.set("name = ?", name.trim());
        }
        if let Some(ref color) = input.color {
            ub.set("color = ?", color);
        }
        if let Some(ref icon) = input.icon {
            ub.set("icon = ?", icon);
        }

        if ub.is_empty() {
            return self.get(id);
        }

        ub.where_eq("id", &id.to_string())
            .where_eq("user_id", &self.scope.id().to_string())
            .where_raw("is_system = false")
            .returning(&["*"]);

        let (sql, params) = ub.build();
        match self.conn.execute_into::<Category>(&sql, &params) {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(LedgerError::DuckDb(e)) if is_unique_violation(&e) => Err(LedgerError::Conflict(
                "category name already exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Delete a user-defined category. Returns `true` when a row was
    /// removed; expenses that referenced it become uncategorized.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute_write(
            "DELETE FROM categories WHERE id = ? AND user_id = ? AND is_system = false",
            &[id.to_string(), self.scope.id().to_string()],
        )?;

        if changed > 0 {
            self.conn.execute_write(
                "UPDATE expenses SET category_id = NULL WHERE category_id = ? AND user_id = ?",
                &[id.to_string(), self.scope.id().to_string()],
            )?;
        }

        Ok(changed > 0)
    }
}

fn is_unique_violation(e: &duckdb::Error) -> bool {
    is_unique_violation_msg(&e.to_string())
}

/// Only duplicate-key/unique wording counts; other constraint failures
/// (NOT NULL, CHECK) must surface as storage errors, not `Conflict`.
fn is_unique_violation_msg(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("duplicate key") || msg.contains("unique constraint")
}
