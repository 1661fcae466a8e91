//! Level-parallel pipeline execution
//!
//! Walks the graph's execution levels, dispatching each level's tasks
//! concurrently under a semaphore and joining before the next level. A task
//! whose predecessor failed or was skipped is recorded as skipped, never
//! run. No retries and no cancellation: the external scheduler owns both.

use crate::error::PipelineResult;
use crate::pipeline::Pipeline;
use sl_core::{RunState, TaskId};
use sl_db::Warehouse;
use sl_tasks::TaskContext;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Options for one executor invocation
pub struct ExecutorOptions {
    /// Maximum tasks running concurrently within a level
    pub threads: usize,

    /// Directory to persist the run-state JSON into (skipped when None)
    pub run_state_dir: Option<PathBuf>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            threads: 4,
            run_state_dir: None,
        }
    }
}

/// Final status of one task within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task ran and returned Ok
    Success,
    /// Task ran and returned an error (or panicked)
    Failed,
    /// Task never ran because an upstream task failed
    Skipped,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of one task within a run
#[derive(Debug, Clone)]
pub struct TaskRunResult {
    /// Task id
    pub task: TaskId,

    /// Final status
    pub status: TaskStatus,

    /// Wall-clock execution time (zero for skipped tasks)
    pub duration: Duration,

    /// Error message for failed/skipped tasks
    pub error: Option<String>,
}

/// Aggregate outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Run identifier (also recorded in the run-state file)
    pub run_id: String,

    /// Total tasks in the pipeline
    pub total: usize,

    /// Tasks that succeeded
    pub succeeded: usize,

    /// Tasks that failed
    pub failed: usize,

    /// Tasks skipped due to upstream failures
    pub skipped: usize,

    /// Total wall-clock time for the run
    pub duration: Duration,
}

impl RunSummary {
    fn from_results(run_id: &str, results: &[TaskRunResult], duration: Duration) -> Self {
        Self {
            run_id: run_id.to_string(),
            total: results.len(),
            succeeded: results
                .iter()
                .filter(|r| r.status == TaskStatus::Success)
                .count(),
            failed: results
                .iter()
                .filter(|r| r.status == TaskStatus::Failed)
                .count(),
            skipped: results
                .iter()
                .filter(|r| r.status == TaskStatus::Skipped)
                .count(),
            duration,
        }
    }

    /// Whether every task in the run succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Execute a pipeline against one warehouse connection.
///
/// Returns per-task results in completion-group order plus a summary.
pub async fn run_pipeline(
    pipeline: &Pipeline,
    warehouse: Arc<dyn Warehouse>,
    options: &ExecutorOptions,
) -> PipelineResult<(Vec<TaskRunResult>, RunSummary)> {
    let start = Instant::now();
    let levels = pipeline.dag().execution_levels()?;

    let pending: Vec<String> = pipeline
        .dag()
        .tasks()
        .iter()
        .map(|t| t.to_string())
        .collect();
    let mut run_state = RunState::new(pipeline.name().as_str(), pending);
    let ctx = TaskContext::new(warehouse, run_state.run_id.clone());
    let semaphore = Arc::new(Semaphore::new(options.threads.max(1)));

    log::info!(
        "starting run {} of pipeline '{}' ({} tasks, {} levels, {} threads)",
        run_state.run_id,
        pipeline.name(),
        pipeline.task_count(),
        levels.len(),
        options.threads.max(1)
    );

    let mut results: Vec<TaskRunResult> = Vec::new();
    let mut halted: HashSet<TaskId> = HashSet::new();

    for level in levels {
        let mut handles = Vec::new();

        for id in level {
            let upstream_halted = pipeline
                .dag()
                .dependencies(id.as_str())
                .iter()
                .any(|dep| halted.contains(dep));

            if upstream_halted {
                log::warn!("[{}] skipped: upstream task failed", id);
                run_state.mark_skipped(id.as_str());
                halted.insert(id.clone());
                results.push(TaskRunResult {
                    task: id,
                    status: TaskStatus::Skipped,
                    duration: Duration::ZERO,
                    error: Some("skipped: upstream task failed".to_string()),
                });
                continue;
            }

            let Some(task) = pipeline.task(id.as_str()).cloned() else {
                log::warn!("[{}] missing from task set, skipping", id);
                continue;
            };
            let ctx = ctx.clone();
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                // acquire only fails if the semaphore is closed, which never happens here
                let _permit = semaphore.acquire().await.ok();
                let task_start = Instant::now();
                let result = task.run(&ctx).await;
                (result, task_start.elapsed())
            });
            handles.push((id, handle));
        }

        for (id, handle) in handles {
            let outcome = match handle.await {
                Ok((Ok(()), duration)) => {
                    run_state.mark_completed(id.as_str(), duration.as_millis() as u64);
                    TaskRunResult {
                        task: id,
                        status: TaskStatus::Success,
                        duration,
                        error: None,
                    }
                }
                Ok((Err(e), duration)) => {
                    let message = e.to_string();
                    run_state.mark_failed(id.as_str(), &message);
                    halted.insert(id.clone());
                    TaskRunResult {
                        task: id,
                        status: TaskStatus::Failed,
                        duration,
                        error: Some(message),
                    }
                }
                Err(join_err) => {
                    let message = format!("task panicked: {join_err}");
                    run_state.mark_failed(id.as_str(), &message);
                    halted.insert(id.clone());
                    TaskRunResult {
                        task: id,
                        status: TaskStatus::Failed,
                        duration: Duration::ZERO,
                        error: Some(message),
                    }
                }
            };
            results.push(outcome);
        }
    }

    run_state.mark_run_finished();
    if let Some(dir) = &options.run_state_dir {
        let path = dir.join(format!("{}_run_state.json", pipeline.name()));
        if let Err(e) = run_state.save(&path) {
            log::warn!("failed to save run state to {}: {}", path.display(), e);
        }
    }

    let summary = RunSummary::from_results(&run_state.run_id, &results, start.elapsed());
    log::info!(
        "run {} finished: {}/{} succeeded, {} failed, {} skipped",
        summary.run_id,
        summary.succeeded,
        summary.total,
        summary.failed,
        summary.skipped
    );

    Ok((results, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sl_core::TaskId;
    use sl_db::DuckDbBackend;
    use sl_tasks::{NoopTask, Task, TaskError, TaskResult};

    /// Task double that always fails with a statement error.
    struct FailingTask {
        id: TaskId,
    }

    impl FailingTask {
        fn new(id: &str) -> Self {
            Self {
                id: TaskId::new(id),
            }
        }
    }

    #[async_trait]
    impl Task for FailingTask {
        fn id(&self) -> &TaskId {
            &self.id
        }

        async fn run(&self, _ctx: &TaskContext) -> TaskResult<()> {
            Err(TaskError::Statement {
                task: self.id.to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn warehouse() -> Arc<DuckDbBackend> {
        Arc::new(DuckDbBackend::in_memory().unwrap())
    }

    fn status_of<'a>(results: &'a [TaskRunResult], id: &str) -> &'a TaskRunResult {
        results.iter().find(|r| r.task == id).unwrap()
    }

    #[tokio::test]
    async fn all_tasks_succeed_on_clean_diamond() {
        let pipeline = Pipeline::builder("diamond")
            .task(NoopTask::new("begin"))
            .task(NoopTask::new("left"))
            .task(NoopTask::new("right"))
            .task(NoopTask::new("join"))
            .fan_out("begin", &["left", "right"])
            .fan_in(&["left", "right"], "join")
            .build()
            .unwrap();

        let (results, summary) =
            run_pipeline(&pipeline, warehouse(), &ExecutorOptions::default())
                .await
                .unwrap();

        assert_eq!(results.len(), 4);
        assert!(summary.all_succeeded());
        assert_eq!(summary.succeeded, 4);
    }

    #[tokio::test]
    async fn failure_skips_all_downstream_tasks() {
        let pipeline = Pipeline::builder("chain")
            .task(NoopTask::new("begin"))
            .task(FailingTask::new("middle"))
            .task(NoopTask::new("end"))
            .edge("begin", "middle")
            .edge("middle", "end")
            .build()
            .unwrap();

        let (results, summary) =
            run_pipeline(&pipeline, warehouse(), &ExecutorOptions::default())
                .await
                .unwrap();

        assert_eq!(status_of(&results, "begin").status, TaskStatus::Success);
        assert_eq!(status_of(&results, "middle").status, TaskStatus::Failed);
        assert_eq!(status_of(&results, "end").status, TaskStatus::Skipped);
        assert!(status_of(&results, "middle")
            .error
            .as_deref()
            .unwrap()
            .contains("boom"));
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn skip_cascades_through_the_graph() {
        let pipeline = Pipeline::builder("cascade")
            .task(FailingTask::new("a"))
            .task(NoopTask::new("b"))
            .task(NoopTask::new("c"))
            .edge("a", "b")
            .edge("b", "c")
            .build()
            .unwrap();

        let (results, summary) =
            run_pipeline(&pipeline, warehouse(), &ExecutorOptions::default())
                .await
                .unwrap();

        assert_eq!(status_of(&results, "b").status, TaskStatus::Skipped);
        assert_eq!(status_of(&results, "c").status, TaskStatus::Skipped);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 2);
    }

    #[tokio::test]
    async fn sibling_of_failed_task_still_runs() {
        let pipeline = Pipeline::builder("siblings")
            .task(NoopTask::new("begin"))
            .task(FailingTask::new("left"))
            .task(NoopTask::new("right"))
            .fan_out("begin", &["left", "right"])
            .build()
            .unwrap();

        let (results, _) = run_pipeline(&pipeline, warehouse(), &ExecutorOptions::default())
            .await
            .unwrap();

        assert_eq!(status_of(&results, "right").status, TaskStatus::Success);
    }

    #[tokio::test]
    async fn single_thread_executes_whole_pipeline() {
        let pipeline = Pipeline::builder("serial")
            .task(NoopTask::new("a"))
            .task(NoopTask::new("b"))
            .edge("a", "b")
            .build()
            .unwrap();

        let options = ExecutorOptions {
            threads: 1,
            run_state_dir: None,
        };
        let (_, summary) = run_pipeline(&pipeline, warehouse(), &options).await.unwrap();
        assert!(summary.all_succeeded());
    }

    #[tokio::test]
    async fn run_state_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::builder("persisted")
            .task(FailingTask::new("only"))
            .build()
            .unwrap();

        let options = ExecutorOptions {
            threads: 2,
            run_state_dir: Some(dir.path().to_path_buf()),
        };
        let (_, summary) = run_pipeline(&pipeline, warehouse(), &options).await.unwrap();

        let path = dir.path().join("persisted_run_state.json");
        let state = RunState::load(&path).unwrap().unwrap();
        assert_eq!(state.run_id, summary.run_id);
        assert_eq!(state.status, sl_core::RunStatus::Failed);
        assert!(state.is_failed("only"));
    }
}
