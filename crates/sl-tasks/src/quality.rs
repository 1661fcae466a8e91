//! Data quality task: ordered scalar checks against the loaded schema
//!
//! Each check pairs a query with the scalar it must return. Checks run in
//! order and the first empty result or mismatch fails the whole task;
//! remaining checks are not evaluated.

use crate::context::TaskContext;
use crate::error::{statement_failure, TaskError, TaskResult};
use crate::task::Task;
use async_trait::async_trait;
use sl_core::TaskId;

/// One quality check: a query returning a single scalar, and the value it
/// must equal.
#[derive(Debug, Clone)]
pub struct QualityCheck {
    /// Query whose first column of the first row is compared
    pub sql: String,

    /// Expected scalar
    pub expected: i64,
}

impl QualityCheck {
    /// Create a new quality check
    pub fn new(sql: impl Into<String>, expected: i64) -> Self {
        Self {
            sql: sql.into(),
            expected,
        }
    }
}

/// Task that gates a pipeline run behind its quality checks
pub struct DataQualityTask {
    id: TaskId,
    checks: Vec<QualityCheck>,
}

impl DataQualityTask {
    /// Create a quality task from an ordered list of checks
    pub fn new(id: impl Into<String>, checks: Vec<QualityCheck>) -> Self {
        Self {
            id: TaskId::new(id),
            checks,
        }
    }

    /// The checks this task evaluates, in order
    pub fn checks(&self) -> &[QualityCheck] {
        &self.checks
    }
}

#[async_trait]
impl Task for DataQualityTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    async fn run(&self, ctx: &TaskContext) -> TaskResult<()> {
        log::info!("[{}] running {} quality checks", self.id, self.checks.len());

        for (i, check) in self.checks.iter().enumerate() {
            let index = i + 1;
            log::info!("[{}] check {}: {}", self.id, index, check.sql);

            let actual = ctx
                .warehouse
                .query_scalar(&check.sql)
                .await
                .map_err(|e| statement_failure(&self.id, e))?;

            match actual {
                None => {
                    let err = TaskError::QualityEmpty {
                        index,
                        sql: check.sql.clone(),
                    };
                    log::error!("{err}");
                    return Err(err);
                }
                Some(actual) if actual != check.expected => {
                    let err = TaskError::QualityMismatch {
                        index,
                        sql: check.sql.clone(),
                        expected: check.expected,
                        actual,
                    };
                    log::error!("{err}");
                    return Err(err);
                }
                Some(actual) => {
                    log::info!("[{}] check {} passed with result {}", self.id, index, actual);
                }
            }
        }

        log::info!("[{}] all {} quality checks passed", self.id, self.checks.len());
        Ok(())
    }
}
