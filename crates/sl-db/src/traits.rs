//! Warehouse trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Warehouse abstraction for Starlift tasks.
///
/// Implementations must be Send + Sync. Callers open a connection per run
/// and hand it to tasks through their context; there is no pooling.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a query and return the first column of the first row.
    ///
    /// Returns `None` when the result set is empty. The quality gate relies
    /// on this to tell an empty result apart from a zero scalar.
    async fn query_scalar(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Execute a query and return its row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Warehouse type identifier for logging
    fn warehouse_type(&self) -> &'static str;
}
