//! DuckDB connection wrapper with schema bootstrap and query execution.
//!
//! Opens a file-backed (or in-memory) DuckDB database, creates the ledger
//! schema on first use, and exposes row-to-JSON execution helpers used by
//! the query interfaces.

use std::path::Path;

use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::config;
use crate::error::Result;

/// DDL for the ledger schema. Ids come from sequences since DuckDB has no
/// AUTOINCREMENT. Referential actions (category deletion detaching its
/// expenses) are handled in application SQL, not declared constraints.
const SCHEMA_SQL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS users_id_seq START 1;
CREATE TABLE IF NOT EXISTS users (
    id BIGINT PRIMARY KEY DEFAULT nextval('users_id_seq'),
    email VARCHAR NOT NULL UNIQUE,
    name VARCHAR NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE SEQUENCE IF NOT EXISTS categories_id_seq START 1;
CREATE TABLE IF NOT EXISTS categories (
    id BIGINT PRIMARY KEY DEFAULT nextval('categories_id_seq'),
    user_id BIGINT NOT NULL,
    name VARCHAR NOT NULL,
    color VARCHAR,
    icon VARCHAR,
    is_system BOOLEAN DEFAULT FALSE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, name)
);

CREATE SEQUENCE IF NOT EXISTS expenses_id_seq START 1;
CREATE TABLE IF NOT EXISTS expenses (
    id BIGINT PRIMARY KEY DEFAULT nextval('expenses_id_seq'),
    user_id BIGINT NOT NULL,
    category_id BIGINT,
    amount DOUBLE NOT NULL CHECK (amount > 0),
    description VARCHAR,
    date DATE NOT NULL,
    payment_method VARCHAR,
    tags VARCHAR,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses (user_id, date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses (category_id);
"#;

/// Wraps a DuckDB connection to the ledger database.
///
/// Construction bootstraps the schema (idempotent) and seeds the demo user
/// plus the system category set, so a fresh database is immediately usable.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open a file-backed database at the given path, creating parent
    /// directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = DuckDbConnection::open(path)?;
        let this = Self { conn };
        this.ensure_schema()?;
        Ok(this)
    }

    /// Open an in-memory database (used by tests and throwaway sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        let this = Self { conn };
        this.ensure_schema()?;
        Ok(this)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Get column metadata AFTER query execution (calling before panics in duckdb-rs)
        let column_names: Vec<String> = rows_result
            .as_ref()
            .unwrap()
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = rows_result.as_ref().unwrap().column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::new();
            for i in 0..column_count {
                let col_name = &column_names[i];
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    ///
    /// First executes the query as `HashMap` rows, then deserializes each
    /// row using `serde_json`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter()
                    .collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Execute a write statement (INSERT/UPDATE/DELETE without RETURNING)
    /// and report the number of affected rows.
    pub fn execute_write(&self, sql: &str, params: &[String]) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();
        let changed = stmt.execute(param_values.as_slice())?;
        Ok(changed)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    /// Create tables, sequences and indexes, then seed the demo user and
    /// system categories. Safe to run on every open.
    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;

        self.conn.execute_batch(&format!(
            "INSERT INTO users (id, email, name) \
             VALUES ({}, 'demo@example.com', 'Demo User') \
             ON CONFLICT DO NOTHING;",
            config::DEFAULT_USER_ID
        ))?;

        for (name, color, icon) in config::system_categories() {
            self.execute_write(
                "INSERT INTO categories (user_id, name, color, icon, is_system) \
                 VALUES (?, ?, ?, ?, true) \
                 ON CONFLICT DO NOTHING",
                &[
                    config::DEFAULT_USER_ID.to_string(),
                    name.to_string(),
                    color.to_string(),
                    icon.to_string(),
                ],
            )?;
        }

        Ok(())
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
///
/// DATE columns become `"YYYY-MM-DD"` strings and TIMESTAMP columns become
/// RFC 3339-ish strings, so rows deserialize cleanly into the serde models.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => date32_to_json(days),
        ValueRef::Timestamp(unit, value) => timestamp_to_json(unit, value),
        _ => {
            // Remaining types (Blob, Interval, List, etc.) do not occur in
            // the ledger schema
            serde_json::Value::Null
        }
    }
}

/// DuckDB DATE is days since the Unix epoch.
fn date32_to_json(days: i32) -> serde_json::Value {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
        .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(serde_json::Value::Null)
}

fn timestamp_to_json(unit: duckdb::types::TimeUnit, value: i64) -> serde_json::Value {
    use duckdb::types::TimeUnit;
    let micros = match unit {
        TimeUnit::Second => value.checked_mul(1_000_000),
        TimeUnit::Millisecond => value.checked_mul(1_000),
        TimeUnit::Microsecond => Some(value),
        TimeUnit::Nanosecond => Some(value / 1_000),
    };
    micros
        .and_then(chrono::DateTime::from_timestamp_micros)
        .map(|ts| serde_json::Value::String(ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
        .unwrap_or(serde_json::Value::Null)
}
