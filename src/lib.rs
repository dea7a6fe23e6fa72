//! Embedded personal expense tracker for Rust.
//!
//! Stores users, categories and expenses in an embedded DuckDB database and
//! exposes typed store interfaces plus a read-only analytics engine
//! (spending summary, daily trends, per-category trends).
//!
//! # Quick start
//!
//! ```no_run
//! use ledgerkit::{LedgerKit, UserScope};
//! use ledgerkit::models::NewExpense;
//!
//! let ledger = LedgerKit::builder().in_memory().build().unwrap();
//! let scope = UserScope::default();
//!
//! ledger.expenses(scope).create(&NewExpense {
//!     amount: 12.50,
//!     category_id: None,
//!     description: Some("lunch".to_string()),
//!     date: "2024-01-15".to_string(),
//!     payment_method: None,
//!     tags: None,
//! }).unwrap();
//!
//! let summary = ledger.analytics(scope).summary(None, None).unwrap();
//! assert_eq!(summary.expense_count, 1);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncLedgerKit;
pub use connection::Connection;
pub use error::{LedgerError, Result};
pub use sql_builder::{SqlBuilder, UpdateBuilder};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// UserScope
// ---------------------------------------------------------------------------

/// The tenant boundary every store and engine call is restricted to.
///
/// Passed explicitly to each accessor rather than baked into the client, so
/// one `LedgerKit` can serve multiple users. [`UserScope::default()`] points
/// at the demo user seeded at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserScope(pub i64);

impl UserScope {
    /// The numeric user id this scope restricts to.
    pub fn id(self) -> i64 {
        self.0
    }
}

impl Default for UserScope {
    fn default() -> Self {
        Self(config::DEFAULT_USER_ID)
    }
}

// ---------------------------------------------------------------------------
// LedgerKitBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`LedgerKit`] instance.
///
/// Use [`LedgerKit::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](LedgerKitBuilder::build) to create the client.
#[derive(Default)]
pub struct LedgerKitBuilder {
    data_dir: Option<PathBuf>,
    in_memory: bool,
}

impl LedgerKitBuilder {
    /// Set a custom data directory.
    ///
    /// If not set, the platform-appropriate default data directory is used
    /// (e.g. `~/.local/share/ledgerkit` on Linux, `~/Library/Application
    /// Support/ledgerkit` on macOS).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use an in-memory database instead of a file. Nothing persists past
    /// the client's lifetime; intended for tests and throwaway sessions.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Build the client, opening the database and bootstrapping the schema
    /// (tables, indexes, the demo user and the system category set).
    pub fn build(self) -> Result<LedgerKit> {
        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            let dir = self.data_dir.unwrap_or_else(config::default_data_dir);
            Connection::open(dir.join(config::DB_FILE_NAME))?
        };
        Ok(LedgerKit { conn })
    }
}

// ---------------------------------------------------------------------------
// LedgerKit
// ---------------------------------------------------------------------------

/// The main entry point for the expense tracker.
///
/// Wraps a [`Connection`] to the embedded DuckDB database and exposes
/// domain-specific query interfaces as lightweight borrowing wrappers, each
/// bound to an explicit [`UserScope`].
///
/// Created via [`LedgerKit::builder()`].
pub struct LedgerKit {
    conn: Connection,
}

impl LedgerKit {
    /// Create a new builder for configuring the client.
    pub fn builder() -> LedgerKitBuilder {
        LedgerKitBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the expense store for the given scope.
    pub fn expenses(&self, scope: UserScope) -> queries::expenses::ExpenseQuery<'_> {
        queries::expenses::ExpenseQuery::new(&self.conn, scope)
    }

    /// Access the category store for the given scope.
    pub fn categories(&self, scope: UserScope) -> queries::categories::CategoryQuery<'_> {
        queries::categories::CategoryQuery::new(&self.conn, scope)
    }

    /// Access the analytics engine for the given scope.
    ///
    /// All analytics operations are read-only and recompute their result
    /// from the current snapshot on every call.
    pub fn analytics(&self, scope: UserScope) -> queries::analytics::AnalyticsQuery<'_> {
        queries::analytics::AnalyticsQuery::new(&self.conn, scope)
    }

    // -- Utility methods ----------------------------------------------------

    /// Execute a raw SQL query against the database.
    ///
    /// Provides escape-hatch access for queries not covered by the
    /// domain-specific interfaces.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    ///
    /// # Returns
    ///
    /// A vector of rows, each represented as a `HashMap<String, serde_json::Value>`.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Consume the client and release all resources.
    ///
    /// Closes the database connection. This is called automatically when
    /// the client is dropped, but can be invoked explicitly for
    /// deterministic cleanup.
    pub fn close(self) {
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for LedgerKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerKit(duckdb)")
    }
}
