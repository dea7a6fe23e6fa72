//! Async wrapper around [`LedgerKit`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all ledger operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! DuckDB queries are CPU-bound but fast, making this approach efficient.
//!
//! # Example
//!
//! ```no_run
//! use ledgerkit::{AsyncLedgerKit, UserScope};
//!
//! async fn example() -> ledgerkit::Result<()> {
//!     let ledger = AsyncLedgerKit::builder().in_memory().build().await?;
//!
//!     // Run any sync ledger method via closure
//!     let summary = ledger.run(|l| {
//!         l.analytics(UserScope::default()).summary(None, None)
//!     }).await?;
//!
//!     // Convenience method for raw SQL
//!     let rows = ledger.sql("SELECT COUNT(*) FROM expenses", &[]).await?;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{LedgerError, Result};
use crate::LedgerKit;

// ---------------------------------------------------------------------------
// AsyncLedgerKitBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncLedgerKit`] instance.
#[derive(Default)]
pub struct AsyncLedgerKitBuilder {
    data_dir: Option<PathBuf>,
    in_memory: bool,
}

impl AsyncLedgerKitBuilder {
    /// Set a custom data directory.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use an in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Build the async client, opening the database and bootstrapping the
    /// schema.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncLedgerKit> {
        tokio::task::spawn_blocking(move || {
            let mut builder = LedgerKit::builder();
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            let ledger = builder.build()?;
            Ok(AsyncLedgerKit {
                inner: Arc::new(Mutex::new(ledger)),
            })
        })
        .await
        .map_err(|e| LedgerError::InvalidParameter(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncLedgerKit
// ---------------------------------------------------------------------------

/// Async wrapper around [`LedgerKit`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`LedgerKit`] is
/// protected by a [`Mutex`] since the DuckDB connection is not `Sync`.
///
/// # Usage
///
/// Use [`run()`](Self::run) to execute any sync ledger method:
///
/// ```no_run
/// # use ledgerkit::{AsyncLedgerKit, UserScope};
/// # async fn example() -> ledgerkit::Result<()> {
/// let ledger = AsyncLedgerKit::builder().in_memory().build().await?;
/// let categories = ledger.run(|l| l.categories(UserScope::default()).list()).await?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncLedgerKit {
    inner: Arc<Mutex<LedgerKit>>,
}

impl AsyncLedgerKit {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncLedgerKitBuilder {
        AsyncLedgerKitBuilder::default()
    }

    /// Run a sync ledger operation on the blocking thread pool.
    ///
    /// The closure receives a `&LedgerKit` reference and should return a
    /// `Result<T>`. The operation runs on a dedicated blocking thread,
    /// keeping the async event loop free.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&LedgerKit) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = ledger
                .lock()
                .map_err(|_| LedgerError::InvalidParameter("ledger lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| LedgerError::InvalidParameter(format!("Task join error: {e}")))?
    }

    /// Execute a raw SQL query asynchronously.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`LedgerKit::sql()`].
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |l| l.sql(&query, &params)).await
    }

    /// Close the client, releasing this handle's reference.
    ///
    /// The underlying connection closes when the last reference goes away;
    /// in-flight [`run()`](Self::run) calls hold one until they finish, so
    /// the drop happens on the blocking pool.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| LedgerError::InvalidParameter(format!("Task join error: {e}")))?
    }
}
