//! No-op marker task for graph begin/end nodes

use crate::context::TaskContext;
use crate::error::TaskResult;
use crate::task::Task;
use async_trait::async_trait;
use sl_core::TaskId;

/// Task that does nothing; marks graph boundaries.
pub struct NoopTask {
    id: TaskId,
}

impl NoopTask {
    /// Create a new marker task
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: TaskId::new(id) }
    }
}

#[async_trait]
impl Task for NoopTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    async fn run(&self, _ctx: &TaskContext) -> TaskResult<()> {
        log::debug!("[{}] marker task", self.id);
        Ok(())
    }
}
