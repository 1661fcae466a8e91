//! Task graph building, validation, and execution ordering
//!
//! Edges run predecessor -> successor: `add_edge(a, b)` means `a` must
//! succeed before `b` may run. Fan-out/fan-in is expressed by multiple
//! edges sharing an endpoint; [`TaskDag::execution_levels`] groups tasks
//! whose predecessors all lie in earlier groups.

use crate::error::{CoreError, CoreResult};
use crate::task_id::TaskId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed acyclic graph of task dependencies
#[derive(Debug, Default)]
pub struct TaskDag {
    /// The underlying graph
    graph: DiGraph<TaskId, ()>,

    /// Map from task id to node index
    node_map: HashMap<TaskId, NodeIndex>,
}

impl TaskDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task to the DAG. Adding the same id twice is a no-op.
    pub fn add_task(&mut self, id: &str) -> CoreResult<NodeIndex> {
        if let Some(&idx) = self.node_map.get(id) {
            return Ok(idx);
        }
        let task_id = TaskId::try_new(id).ok_or_else(|| CoreError::EmptyName {
            context: "task id in DAG".into(),
        })?;
        let idx = self.graph.add_node(task_id.clone());
        self.node_map.insert(task_id, idx);
        Ok(idx)
    }

    /// Add a dependency edge: `from` must succeed before `to` runs.
    ///
    /// Both endpoints must already be registered; a typo in an edge fails
    /// loudly instead of silently inserting a node.
    pub fn add_edge(&mut self, from: &str, to: &str) -> CoreResult<()> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        self.graph.add_edge(from_idx, to_idx, ());
        Ok(())
    }

    fn index_of(&self, id: &str) -> CoreResult<NodeIndex> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| CoreError::UnknownTask {
                name: id.to_string(),
            })
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.find_cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Follow edges from a node caught in a cycle to render a readable path
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut current = start;

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Get tasks in topological order (predecessors first)
    pub fn topological_order(&self) -> CoreResult<Vec<TaskId>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.find_cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Group tasks into execution levels.
    ///
    /// Every task in level N has all of its predecessors in levels < N, so
    /// tasks within one level may run concurrently and level N+1 must wait
    /// for level N. Levels are sorted by task id for deterministic output.
    pub fn execution_levels(&self) -> CoreResult<Vec<Vec<TaskId>>> {
        self.validate()?;

        let mut indegree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                (
                    idx,
                    self.graph
                        .edges_directed(idx, petgraph::Direction::Incoming)
                        .count(),
                )
            })
            .collect();

        let mut ready: Vec<NodeIndex> = indegree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&idx, _)| idx)
            .collect();

        let mut levels = Vec::new();
        while !ready.is_empty() {
            let mut level: Vec<TaskId> =
                ready.iter().map(|&idx| self.graph[idx].clone()).collect();
            level.sort();

            let mut next = Vec::new();
            for &idx in &ready {
                for edge in self.graph.edges_directed(idx, petgraph::Direction::Outgoing) {
                    let target = edge.target();
                    let degree = indegree
                        .get_mut(&target)
                        .expect("edge target missing from indegree map");
                    *degree -= 1;
                    if *degree == 0 {
                        next.push(target);
                    }
                }
            }

            levels.push(level);
            ready = next;
        }

        Ok(levels)
    }

    /// Get direct predecessors of a task
    pub fn dependencies(&self, id: &str) -> Vec<TaskId> {
        self.neighbors(id, petgraph::Direction::Incoming)
    }

    /// Get direct successors of a task
    pub fn dependents(&self, id: &str) -> Vec<TaskId> {
        self.neighbors(id, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: petgraph::Direction) -> Vec<TaskId> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<TaskId> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                petgraph::Direction::Incoming => self.graph[e.source()].clone(),
                petgraph::Direction::Outgoing => self.graph[e.target()].clone(),
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Tasks with no predecessors
    pub fn roots(&self) -> Vec<TaskId> {
        self.endpoint_tasks(petgraph::Direction::Incoming)
    }

    /// Tasks with no successors
    pub fn leaves(&self) -> Vec<TaskId> {
        self.endpoint_tasks(petgraph::Direction::Outgoing)
    }

    fn endpoint_tasks(&self, direction: petgraph::Direction) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, direction).next().is_none())
            .map(|idx| self.graph[idx].clone())
            .collect();
        ids.sort();
        ids
    }

    /// Check if a task exists in the DAG
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// All task ids in the DAG, sorted
    pub fn tasks(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.node_map.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of tasks in the DAG
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Whether the DAG holds no tasks
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
