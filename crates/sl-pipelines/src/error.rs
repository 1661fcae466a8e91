//! Error types for sl-pipelines

use sl_core::CoreError;
use thiserror::Error;

/// Pipeline assembly and lookup errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// P001: pipeline declared without any tasks
    #[error("[P001] Pipeline '{name}' has no tasks")]
    Empty { name: String },

    /// P002: no built-in pipeline with that name
    #[error("[P002] Unknown pipeline '{name}'. Available: {available}")]
    UnknownPipeline { name: String, available: String },

    /// Graph construction error (unknown task in edge, cycle, empty id)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
