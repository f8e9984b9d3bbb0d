//! Task catalog entries and their solve-input projection.

use serde::{Deserialize, Serialize};

/// Catalog state of a task. Only `Waiting` tasks participate in a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Eligible for the next solve.
    Waiting,
    /// Placed on a route by a previous solve.
    Scheduled,
    /// Service performed.
    Completed,
    /// Withdrawn by the tenant.
    Cancelled,
}

/// A schedulable unit of work as stored in the tenant's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Catalog identity.
    pub id: u64,
    /// Owning tenant.
    pub tenant_id: u64,
    /// Plan the task belongs to.
    pub plan_id: u64,
    /// Human-readable task code.
    pub code: String,
    /// Geographic node to visit.
    pub node_id: u64,
    /// Earliest service start, seconds from midnight.
    pub tw_start_sec: i64,
    /// Latest service start, seconds from midnight.
    pub tw_end_sec: i64,
    /// On-site service duration in seconds.
    pub service_time_sec: i64,
    /// Load consumed on the serving vehicle.
    pub demand: i64,
    /// Catalog state.
    pub state: TaskState,
}

impl Task {
    /// Immutable solve-input projection of this task.
    pub fn node(&self) -> TaskNode {
        TaskNode {
            task_id: self.id,
            node_id: self.node_id,
            tw_start_sec: self.tw_start_sec,
            tw_end_sec: self.tw_end_sec,
            service_time_sec: self.service_time_sec,
            demand: self.demand,
        }
    }
}

/// Solve input: one task node with its window, service time, and demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Catalog identity of the task.
    pub task_id: u64,
    /// Geographic node to visit.
    pub node_id: u64,
    /// Earliest service start, seconds from midnight.
    pub tw_start_sec: i64,
    /// Latest service start, seconds from midnight.
    pub tw_end_sec: i64,
    /// On-site service duration in seconds.
    pub service_time_sec: i64,
    /// Load consumed on the serving vehicle.
    pub demand: i64,
}
