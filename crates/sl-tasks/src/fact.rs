//! Fact load task: one INSERT...SELECT into the fact table
//!
//! The SELECT half comes from the SQL template catalog; this task only
//! decides the column-list surface of the INSERT. There is no dedup guard
//! here, so retrying a completed load appends duplicate rows.

use crate::context::TaskContext;
use crate::error::{statement_failure, TaskResult};
use crate::task::Task;
use async_trait::async_trait;
use sl_core::quoting::{quote_ident, quote_qualified};
use sl_core::{TableName, TaskId};

/// Task that populates the fact table from staged data
pub struct LoadFactTask {
    id: TaskId,
    table: TableName,
    select: String,
    columns: Option<Vec<String>>,
}

impl LoadFactTask {
    /// Create a fact load targeting all columns implicitly
    pub fn new(id: impl Into<String>, table: impl Into<String>, select: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            table: TableName::new(table),
            select: select.into(),
            columns: None,
        }
    }

    /// Target exactly these columns, in this order
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Render the INSERT statement
    pub fn insert_sql(&self) -> String {
        let table = quote_qualified(self.table.as_str());
        match &self.columns {
            Some(columns) => {
                let list = columns
                    .iter()
                    .map(|c| quote_ident(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("INSERT INTO {} ({})\n{}", table, list, self.select)
            }
            None => format!("INSERT INTO {}\n{}", table, self.select),
        }
    }
}

#[async_trait]
impl Task for LoadFactTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    async fn run(&self, ctx: &TaskContext) -> TaskResult<()> {
        log::info!("[{}] loading fact table {}", self.id, self.table);

        ctx.warehouse
            .execute(&self.insert_sql())
            .await
            .map_err(|e| statement_failure(&self.id, e))?;

        log::info!("[{}] loaded fact table {}", self.id, self.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_db::{DuckDbBackend, Warehouse};
    use std::sync::Arc;

    #[test]
    fn insert_sql_without_columns_targets_all_implicitly() {
        let task = LoadFactTask::new("load_fact", "songplays", "SELECT 1");
        assert_eq!(task.insert_sql(), "INSERT INTO \"songplays\"\nSELECT 1");
    }

    #[test]
    fn insert_sql_with_columns_preserves_order() {
        let task = LoadFactTask::new("load_fact", "songplays", "SELECT 1, 2")
            .with_columns(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(
            task.insert_sql(),
            "INSERT INTO \"songplays\" (\"a\", \"b\")\nSELECT 1, 2"
        );
    }

    #[tokio::test]
    async fn run_inserts_selected_rows() {
        let warehouse = Arc::new(DuckDbBackend::in_memory().unwrap());
        warehouse
            .execute_batch(
                "CREATE TABLE staging (n INT);
                 INSERT INTO staging VALUES (1), (2), (3);
                 CREATE TABLE fact (n INT);",
            )
            .await
            .unwrap();

        let ctx = TaskContext::new(warehouse.clone(), "test-run");
        let task = LoadFactTask::new("load_fact", "fact", "SELECT n FROM staging");
        task.run(&ctx).await.unwrap();

        assert_eq!(warehouse.query_count("SELECT * FROM fact").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn run_with_column_list_targets_named_columns() {
        let warehouse = Arc::new(DuckDbBackend::in_memory().unwrap());
        warehouse
            .execute_batch(
                "CREATE TABLE staging (n INT);
                 INSERT INTO staging VALUES (7);
                 CREATE TABLE fact (n INT, extra VARCHAR DEFAULT 'x');",
            )
            .await
            .unwrap();

        let ctx = TaskContext::new(warehouse.clone(), "test-run");
        let task = LoadFactTask::new("load_fact", "fact", "SELECT n FROM staging")
            .with_columns(vec!["n".to_string()]);
        task.run(&ctx).await.unwrap();

        assert_eq!(
            warehouse
                .query_scalar("SELECT n FROM fact")
                .await
                .unwrap(),
            Some(7)
        );
    }

    #[tokio::test]
    async fn run_failure_carries_original_message() {
        let warehouse = Arc::new(DuckDbBackend::in_memory().unwrap());
        let ctx = TaskContext::new(warehouse, "test-run");
        let task = LoadFactTask::new("load_fact", "missing_fact", "SELECT 1");

        let err = task.run(&ctx).await.unwrap_err();
        assert!(matches!(err, crate::TaskError::Statement { .. }));
        assert!(err.to_string().contains("load_fact"));
    }
}
