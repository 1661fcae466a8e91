//! Error types for sl-tasks
//!
//! Two failure families: statement execution (any warehouse-driver error,
//! wrapped with the original message attached) and data-quality failures
//! (mismatch or empty result, carrying the offending check's index, query
//! text, and values). All of them are fatal to the task.

use sl_core::TaskId;
use sl_db::DbError;
use thiserror::Error;

/// Task-fatal errors raised by the ETL tasks
#[derive(Error, Debug)]
pub enum TaskError {
    /// Statement execution failure (T001)
    #[error("[T001] Task '{task}' statement failed: {message}")]
    Statement { task: String, message: String },

    /// Data quality mismatch (T002); `index` is 1-based
    #[error(
        "[T002] Data quality check {index} failed: query `{sql}` returned {actual} but expected {expected}"
    )]
    QualityMismatch {
        index: usize,
        sql: String,
        expected: i64,
        actual: i64,
    },

    /// Data quality empty result (T003); `index` is 1-based
    #[error("[T003] Data quality check {index} returned no results for query `{sql}`")]
    QualityEmpty { index: usize, sql: String },
}

/// Result type alias for TaskError
pub type TaskResult<T> = Result<T, TaskError>;

/// Wrap a driver error into a task-fatal statement failure, logging first.
pub(crate) fn statement_failure(task: &TaskId, err: DbError) -> TaskError {
    let err = TaskError::Statement {
        task: task.to_string(),
        message: err.to_string(),
    };
    log::error!("{err}");
    err
}
