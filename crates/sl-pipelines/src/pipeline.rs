//! Pipeline type and builder
//!
//! A pipeline is a named, schedulable set of tasks wired into a validated
//! DAG. Edges are declared explicitly (`edge`, `fan_out`, `fan_in`); the
//! contract is always the same: every predecessor must succeed before a
//! task runs. Schedule and max_active_runs are metadata for the external
//! scheduler; nothing in this crate evaluates cron expressions.

use crate::error::{PipelineError, PipelineResult};
use sl_core::{CoreError, PipelineName, TaskDag, TaskId};
use sl_tasks::Task;
use std::collections::HashMap;
use std::sync::Arc;

/// A named task graph with scheduling metadata
pub struct Pipeline {
    name: PipelineName,
    description: String,
    schedule: String,
    max_active_runs: usize,
    tasks: HashMap<TaskId, Arc<dyn Task>>,
    dag: TaskDag,
}

impl Pipeline {
    /// Start building a pipeline
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// Pipeline name
    pub fn name(&self) -> &PipelineName {
        &self.name
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cron schedule string for the external scheduler
    pub fn schedule(&self) -> &str {
        &self.schedule
    }

    /// Maximum concurrent runs of this pipeline
    pub fn max_active_runs(&self) -> usize {
        self.max_active_runs
    }

    /// The validated dependency graph
    pub fn dag(&self) -> &TaskDag {
        &self.dag
    }

    /// Look up a task by id
    pub fn task(&self, id: &str) -> Option<&Arc<dyn Task>> {
        self.tasks.get(id)
    }

    /// Number of tasks in the pipeline
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Builder for [`Pipeline`]
pub struct PipelineBuilder {
    name: String,
    description: String,
    schedule: String,
    max_active_runs: usize,
    tasks: Vec<Arc<dyn Task>>,
    edges: Vec<(String, String)>,
}

impl PipelineBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: "0 * * * *".to_string(),
            max_active_runs: 1,
            tasks: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Set the human-readable description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the cron schedule string
    pub fn schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = schedule.into();
        self
    }

    /// Set the maximum concurrent runs
    pub fn max_active_runs(mut self, max_active_runs: usize) -> Self {
        self.max_active_runs = max_active_runs;
        self
    }

    /// Register a task
    pub fn task(mut self, task: impl Task + 'static) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    /// Declare that `from` must succeed before `to` runs
    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.edges.push((from.to_string(), to.to_string()));
        self
    }

    /// Declare edges from one task to each of `tos`
    pub fn fan_out(mut self, from: &str, tos: &[&str]) -> Self {
        for to in tos {
            self.edges.push((from.to_string(), to.to_string()));
        }
        self
    }

    /// Declare edges from each of `froms` to one task
    pub fn fan_in(mut self, froms: &[&str], to: &str) -> Self {
        for from in froms {
            self.edges.push((from.to_string(), to.to_string()));
        }
        self
    }

    /// Validate and freeze the pipeline.
    ///
    /// Fails on duplicate task ids, edges naming unregistered tasks,
    /// cycles, or an empty task set.
    pub fn build(self) -> PipelineResult<Pipeline> {
        if self.tasks.is_empty() {
            return Err(PipelineError::Empty { name: self.name });
        }

        let mut tasks: HashMap<TaskId, Arc<dyn Task>> = HashMap::new();
        let mut dag = TaskDag::new();

        for task in self.tasks {
            let id = task.id().clone();
            if tasks.contains_key(&id) {
                return Err(CoreError::DuplicateTask {
                    name: id.into_inner(),
                }
                .into());
            }
            dag.add_task(id.as_str())?;
            tasks.insert(id, task);
        }

        for (from, to) in &self.edges {
            dag.add_edge(from, to)?;
        }

        dag.validate()?;

        Ok(Pipeline {
            name: PipelineName::new(self.name),
            description: self.description,
            schedule: self.schedule,
            max_active_runs: self.max_active_runs,
            tasks,
            dag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_tasks::NoopTask;

    #[test]
    fn builds_a_linear_pipeline() {
        let pipeline = Pipeline::builder("linear")
            .description("two markers")
            .task(NoopTask::new("begin"))
            .task(NoopTask::new("end"))
            .edge("begin", "end")
            .build()
            .unwrap();

        assert_eq!(pipeline.name().as_str(), "linear");
        assert_eq!(pipeline.task_count(), 2);
        assert_eq!(pipeline.schedule(), "0 * * * *");
        assert_eq!(pipeline.max_active_runs(), 1);
        assert!(pipeline.task("begin").is_some());
        assert!(pipeline.task("missing").is_none());
    }

    #[test]
    fn rejects_empty_pipeline() {
        let err = Pipeline::builder("empty").build().err().unwrap();
        assert!(matches!(err, PipelineError::Empty { .. }));
    }

    #[test]
    fn rejects_duplicate_task_ids() {
        let err = Pipeline::builder("dup")
            .task(NoopTask::new("begin"))
            .task(NoopTask::new("begin"))
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PipelineError::Core(CoreError::DuplicateTask { .. })
        ));
    }

    #[test]
    fn rejects_edge_to_unregistered_task() {
        let err = Pipeline::builder("typo")
            .task(NoopTask::new("begin"))
            .edge("begin", "ened")
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PipelineError::Core(CoreError::UnknownTask { name }) if name == "ened"
        ));
    }

    #[test]
    fn rejects_cycles() {
        let err = Pipeline::builder("cycle")
            .task(NoopTask::new("a"))
            .task(NoopTask::new("b"))
            .edge("a", "b")
            .edge("b", "a")
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PipelineError::Core(CoreError::CircularDependency { .. })
        ));
    }

    #[test]
    fn fan_out_and_fan_in_declare_all_edges() {
        let pipeline = Pipeline::builder("fan")
            .task(NoopTask::new("begin"))
            .task(NoopTask::new("left"))
            .task(NoopTask::new("right"))
            .task(NoopTask::new("join"))
            .fan_out("begin", &["left", "right"])
            .fan_in(&["left", "right"], "join")
            .build()
            .unwrap();

        assert_eq!(pipeline.dag().dependencies("join").len(), 2);
        assert_eq!(pipeline.dag().dependents("begin").len(), 2);
    }
}
