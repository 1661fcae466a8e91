//! Run state tracking for pipeline executions
//!
//! One JSON document per pipeline run, recording which tasks completed,
//! failed, were skipped, or never started. The executor writes it after
//! every run; the external scheduler owns retries, so the file is a record,
//! not a resume point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::error::CoreResult;

/// State of a pipeline run in progress or completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique identifier for this run
    pub run_id: String,

    /// Pipeline this run belongs to
    pub pipeline: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the state was last updated
    pub last_updated_at: DateTime<Utc>,

    /// Current status of the run
    pub status: RunStatus,

    /// Tasks that completed successfully
    pub completed_tasks: Vec<CompletedTask>,

    /// Tasks that failed during execution
    pub failed_tasks: Vec<FailedTask>,

    /// Tasks skipped because an upstream task failed
    pub skipped_tasks: Vec<String>,

    /// Tasks that have not run yet
    pub pending_tasks: Vec<String>,
}

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run is currently in progress
    Running,
    /// Run completed successfully
    Completed,
    /// Run failed with errors
    Failed,
}

/// A task that completed successfully
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTask {
    /// Task id
    pub name: String,

    /// When the task completed
    pub completed_at: DateTime<Utc>,

    /// How long the task took to execute (in milliseconds)
    pub duration_ms: u64,
}

/// A task that failed during execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedTask {
    /// Task id
    pub name: String,

    /// When the task failed
    pub failed_at: DateTime<Utc>,

    /// Error message
    pub error: String,
}

impl RunState {
    /// Create a new run state with all tasks pending
    pub fn new(pipeline: &str, pending_tasks: Vec<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            pipeline: pipeline.to_string(),
            started_at: Utc::now(),
            last_updated_at: Utc::now(),
            status: RunStatus::Running,
            completed_tasks: Vec::new(),
            failed_tasks: Vec::new(),
            skipped_tasks: Vec::new(),
            pending_tasks,
        }
    }

    /// Load run state from a file path
    pub fn load(path: &Path) -> CoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let state: RunState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// Save run state to a file path atomically
    ///
    /// Writes to a temporary file and renames to avoid a torn document.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Mark a task as completed
    pub fn mark_completed(&mut self, name: &str, duration_ms: u64) {
        self.pending_tasks.retain(|n| n != name);
        self.completed_tasks.push(CompletedTask {
            name: name.to_string(),
            completed_at: Utc::now(),
            duration_ms,
        });
        self.last_updated_at = Utc::now();
    }

    /// Mark a task as failed
    pub fn mark_failed(&mut self, name: &str, error: &str) {
        self.pending_tasks.retain(|n| n != name);
        self.failed_tasks.push(FailedTask {
            name: name.to_string(),
            failed_at: Utc::now(),
            error: error.to_string(),
        });
        self.last_updated_at = Utc::now();
    }

    /// Mark a task as skipped because an upstream task failed
    pub fn mark_skipped(&mut self, name: &str) {
        self.pending_tasks.retain(|n| n != name);
        self.skipped_tasks.push(name.to_string());
        self.last_updated_at = Utc::now();
    }

    /// Mark the run as finished, deriving the final status
    pub fn mark_run_finished(&mut self) {
        self.status = if self.failed_tasks.is_empty() && self.skipped_tasks.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        self.last_updated_at = Utc::now();
    }

    /// Check if a task has already been completed
    pub fn is_completed(&self, name: &str) -> bool {
        self.completed_tasks.iter().any(|t| t.name == name)
    }

    /// Check if a task has failed
    pub fn is_failed(&self, name: &str) -> bool {
        self.failed_tasks.iter().any(|t| t.name == name)
    }

    /// Get summary statistics
    pub fn summary(&self) -> RunStateSummary {
        RunStateSummary {
            completed: self.completed_tasks.len(),
            failed: self.failed_tasks.len(),
            skipped: self.skipped_tasks.len(),
            pending: self.pending_tasks.len(),
            total_duration_ms: self.completed_tasks.iter().map(|t| t.duration_ms).sum(),
        }
    }
}

/// Summary statistics for a run state
#[derive(Debug, Clone)]
pub struct RunStateSummary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub pending: usize,
    pub total_duration_ms: u64,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}
