//! Task trait definition

use crate::context::TaskContext;
use crate::error::TaskResult;
use async_trait::async_trait;
use sl_core::TaskId;

/// A unit of work an external scheduler can invoke.
///
/// `run` executes synchronously from the task's point of view: the
/// warehouse call is issued and awaited before returning. Retries,
/// timeouts, and cancellation are the scheduler's concern, not the task's.
#[async_trait]
pub trait Task: Send + Sync {
    /// Identifier of this task within its pipeline
    fn id(&self) -> &TaskId;

    /// Execute the task against the context's warehouse
    async fn run(&self, ctx: &TaskContext) -> TaskResult<()>;
}
