//! Dimension load task: optional truncate, then INSERT...SELECT
//!
//! Truncate and insert are two separate statements with no transactional
//! wrapping; a crash between them leaves the table empty until the next
//! run. An additive load (`truncate_insert` false) duplicates rows when the
//! whole task is retried.

use crate::context::TaskContext;
use crate::error::{statement_failure, TaskResult};
use crate::task::Task;
use async_trait::async_trait;
use sl_core::quoting::quote_qualified;
use sl_core::{TableName, TaskId};

/// Task that populates one dimension table from a SELECT body
pub struct LoadDimensionTask {
    id: TaskId,
    table: TableName,
    select: String,
    truncate_insert: bool,
}

impl LoadDimensionTask {
    /// Create a dimension load; truncate-insert is the default pattern
    pub fn new(id: impl Into<String>, table: impl Into<String>, select: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            table: TableName::new(table),
            select: select.into(),
            truncate_insert: true,
        }
    }

    /// Choose between truncate-insert (true) and additive append (false)
    pub fn with_truncate_insert(mut self, truncate_insert: bool) -> Self {
        self.truncate_insert = truncate_insert;
        self
    }

    fn truncate_sql(&self) -> String {
        format!("TRUNCATE TABLE {}", quote_qualified(self.table.as_str()))
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {}\n{}",
            quote_qualified(self.table.as_str()),
            self.select
        )
    }
}

#[async_trait]
impl Task for LoadDimensionTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    async fn run(&self, ctx: &TaskContext) -> TaskResult<()> {
        if self.truncate_insert {
            log::info!("[{}] truncating {}", self.id, self.table);
            ctx.warehouse
                .execute(&self.truncate_sql())
                .await
                .map_err(|e| statement_failure(&self.id, e))?;
        }

        log::info!("[{}] loading dimension table {}", self.id, self.table);
        ctx.warehouse
            .execute(&self.insert_sql())
            .await
            .map_err(|e| statement_failure(&self.id, e))?;

        log::info!("[{}] loaded dimension table {}", self.id, self.table);
        Ok(())
    }
}
