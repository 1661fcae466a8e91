//! sl-tasks - Warehouse ETL tasks for Starlift
//!
//! The four task implementations (stage, fact load, dimension load, data
//! quality) plus the no-op marker task, behind a single `Task` trait an
//! external scheduler invokes with a `TaskContext`.

pub mod context;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod noop;
pub mod quality;
pub mod stage;
pub mod task;

pub use context::TaskContext;
pub use dimension::LoadDimensionTask;
pub use error::{TaskError, TaskResult};
pub use fact::LoadFactTask;
pub use noop::NoopTask;
pub use quality::{DataQualityTask, QualityCheck};
pub use stage::{CopyFormat, CopySpec, StageTask};
pub use task::Task;
