//! Stage task: bulk-load object storage into a staging table
//!
//! Builds exactly one COPY statement and hands it to the warehouse. No
//! row-count or schema validation happens here; success means the warehouse
//! accepted the statement.

use crate::context::TaskContext;
use crate::error::{statement_failure, TaskResult};
use crate::task::Task;
use async_trait::async_trait;
use sl_core::quoting::{escape_literal, quote_qualified};
use sl_core::{TableName, TaskId};

/// Source format descriptor for a bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CopyFormat {
    /// JSON with automatic field mapping
    #[default]
    JsonAuto,
    /// JSON with an explicit jsonpaths manifest
    JsonPaths(String),
}

impl CopyFormat {
    /// The descriptor string placed after `FORMAT AS JSON`
    fn descriptor(&self) -> &str {
        match self {
            CopyFormat::JsonAuto => "auto",
            CopyFormat::JsonPaths(uri) => uri,
        }
    }
}

/// One bulk-load command: all objects under `bucket/key` into `table`,
/// authenticated via the IAM role the warehouse assumes.
#[derive(Debug, Clone)]
pub struct CopySpec {
    /// Target staging table
    pub table: TableName,

    /// Source bucket name
    pub bucket: String,

    /// Source key prefix within the bucket
    pub key: String,

    /// IAM role identifier; opaque here, resolved by the warehouse
    pub role_arn: String,

    /// Payload format
    pub format: CopyFormat,
}

impl CopySpec {
    /// Object-storage URI the COPY reads from
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    /// Render the COPY statement in warehouse dialect
    pub fn to_sql(&self) -> String {
        format!(
            "COPY {table}\nFROM '{uri}'\nIAM_ROLE '{role}'\nFORMAT AS JSON '{format}'",
            table = quote_qualified(self.table.as_str()),
            uri = escape_literal(&self.uri()),
            role = escape_literal(&self.role_arn),
            format = escape_literal(self.format.descriptor()),
        )
    }
}

/// Task that stages object-storage data into the warehouse
pub struct StageTask {
    id: TaskId,
    spec: CopySpec,
}

impl StageTask {
    /// Create a new stage task
    pub fn new(id: impl Into<String>, spec: CopySpec) -> Self {
        Self {
            id: TaskId::new(id),
            spec,
        }
    }

    /// The bulk-load spec this task executes
    pub fn spec(&self) -> &CopySpec {
        &self.spec
    }
}

#[async_trait]
impl Task for StageTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    async fn run(&self, ctx: &TaskContext) -> TaskResult<()> {
        log::info!(
            "[{}] staging {} into {}",
            self.id,
            self.spec.uri(),
            self.spec.table
        );

        let sql = self.spec.to_sql();
        ctx.warehouse
            .execute(&sql)
            .await
            .map_err(|e| statement_failure(&self.id, e))?;

        log::info!("[{}] staged {}", self.id, self.spec.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_db::{DbResult, Warehouse};
    use std::sync::{Arc, Mutex};

    /// Warehouse double that records every executed statement.
    #[derive(Default)]
    struct RecordingWarehouse {
        statements: Mutex<Vec<String>>,
    }

    impl RecordingWarehouse {
        fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Warehouse for RecordingWarehouse {
        async fn execute(&self, sql: &str) -> DbResult<usize> {
            self.statements.lock().unwrap().push(sql.to_string());
            Ok(0)
        }

        async fn execute_batch(&self, sql: &str) -> DbResult<()> {
            self.statements.lock().unwrap().push(sql.to_string());
            Ok(())
        }

        async fn query_scalar(&self, _sql: &str) -> DbResult<Option<i64>> {
            Ok(Some(0))
        }

        async fn query_count(&self, _sql: &str) -> DbResult<usize> {
            Ok(0)
        }

        async fn relation_exists(&self, _name: &str) -> DbResult<bool> {
            Ok(false)
        }

        fn warehouse_type(&self) -> &'static str {
            "recording"
        }
    }

    fn events_spec() -> CopySpec {
        CopySpec {
            table: TableName::new("staging_events"),
            bucket: "b".to_string(),
            key: "log-data".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/warehouse-s3".to_string(),
            format: CopyFormat::default(),
        }
    }

    #[test]
    fn copy_sql_references_uri_table_and_role() {
        let sql = events_spec().to_sql();

        assert!(sql.starts_with("COPY \"staging_events\""));
        assert!(sql.contains("FROM 's3://b/log-data'"));
        assert!(sql.contains("IAM_ROLE 'arn:aws:iam::123456789012:role/warehouse-s3'"));
        assert!(sql.ends_with("FORMAT AS JSON 'auto'"));
    }

    #[test]
    fn copy_sql_with_jsonpaths_manifest() {
        let mut spec = events_spec();
        spec.format = CopyFormat::JsonPaths("s3://b/log_json_path.json".to_string());

        assert!(spec
            .to_sql()
            .ends_with("FORMAT AS JSON 's3://b/log_json_path.json'"));
    }

    #[test]
    fn copy_sql_escapes_literals() {
        let mut spec = events_spec();
        spec.role_arn = "it's".to_string();
        assert!(spec.to_sql().contains("IAM_ROLE 'it''s'"));
    }

    #[tokio::test]
    async fn run_issues_exactly_one_copy_statement() {
        let warehouse = Arc::new(RecordingWarehouse::default());
        let ctx = TaskContext::new(warehouse.clone(), "test-run");
        let task = StageTask::new("stage_events", events_spec());

        task.run(&ctx).await.unwrap();

        let statements = warehouse.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("COPY"));
        assert!(statements[0].contains("s3://b/log-data"));
        assert!(statements[0].contains("staging_events"));
    }

    #[tokio::test]
    async fn run_wraps_driver_error() {
        struct FailingWarehouse;

        #[async_trait]
        impl Warehouse for FailingWarehouse {
            async fn execute(&self, _sql: &str) -> DbResult<usize> {
                Err(sl_db::DbError::ExecutionError("permission denied".into()))
            }
            async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
                unreachable!()
            }
            async fn query_scalar(&self, _sql: &str) -> DbResult<Option<i64>> {
                unreachable!()
            }
            async fn query_count(&self, _sql: &str) -> DbResult<usize> {
                unreachable!()
            }
            async fn relation_exists(&self, _name: &str) -> DbResult<bool> {
                unreachable!()
            }
            fn warehouse_type(&self) -> &'static str {
                "failing"
            }
        }

        let ctx = TaskContext::new(Arc::new(FailingWarehouse), "test-run");
        let task = StageTask::new("stage_events", events_spec());

        let err = task.run(&ctx).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("stage_events"));
        assert!(message.contains("permission denied"));
    }
}
