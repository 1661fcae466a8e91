//! Execution context handed to each task invocation

use sl_db::Warehouse;
use std::sync::Arc;

/// Context provided by the scheduler for one task invocation.
///
/// Carries the warehouse connection and the run id; tasks own no other
/// state about the run they belong to.
#[derive(Clone)]
pub struct TaskContext {
    /// Warehouse connection for this run
    pub warehouse: Arc<dyn Warehouse>,

    /// Identifier of the enclosing pipeline run
    pub run_id: String,
}

impl TaskContext {
    /// Create a new task context
    pub fn new(warehouse: Arc<dyn Warehouse>, run_id: impl Into<String>) -> Self {
        Self {
            warehouse,
            run_id: run_id.into(),
        }
    }
}
