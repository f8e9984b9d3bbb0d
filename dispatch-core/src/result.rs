//! Optimizer output: routes, stops, unassigned tasks, and KPIs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TaskNode;

/// Overall outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    /// A feasible (possibly partial) assignment was found.
    Solved,
    /// No solution; every task is reported unassigned.
    Failed,
}

/// Why a task was left off every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignedReason {
    /// The optimizer found no solution at all.
    NoSolution,
    /// The task was excluded via its drop disjunction.
    Dropped,
}

impl UnassignedReason {
    /// Wire code for the reason, e.g. `"DROPPED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSolution => "NO_SOLUTION",
            Self::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline numbers for a solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveKpi {
    /// Tasks placed on a route.
    pub assigned_count: usize,
    /// Tasks left off every route.
    pub unassigned_count: usize,
    /// Wall-clock duration of the solve.
    pub solve_duration: Duration,
}

/// One visit in a vehicle's ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResult {
    /// Position within the route, starting at 0.
    pub seq: u32,
    /// Task served at this stop.
    pub task_id: u64,
    /// Node the stop takes place at.
    pub node_id: u64,
    /// Arrival time, seconds from midnight.
    pub eta_sec: i64,
    /// Departure time, seconds from midnight.
    pub etd_sec: i64,
    /// On-site service duration in seconds.
    pub service_time_sec: i64,
}

/// The visit sequence computed for one vehicle. Vehicles that received no
/// task keep an empty stop list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Vehicle the route belongs to.
    pub vehicle_id: u64,
    /// Route distance in meters, including the return leg.
    pub total_distance_m: i64,
    /// Route duration in seconds, shift start to return.
    pub total_time_sec: i64,
    /// Ordered visits.
    pub stops: Vec<StopResult>,
}

/// One task excluded from every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedResult {
    /// Task that was not served.
    pub task_id: u64,
    /// Machine-readable reason.
    pub reason: UnassignedReason,
    /// Free-text detail for operators.
    pub detail: String,
}

/// Full output of one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Overall outcome.
    pub status: ResultStatus,
    /// Human-readable outcome message.
    pub message: String,
    /// Headline numbers.
    pub kpi: SolveKpi,
    /// One entry per vehicle.
    pub routes: Vec<RouteResult>,
    /// Tasks left off every route.
    pub unassigned: Vec<UnassignedResult>,
}

impl SolveResult {
    /// The no-solution outcome: `Failed`, with every task reported
    /// unassigned as [`UnassignedReason::NoSolution`].
    pub fn no_solution(tasks: &[TaskNode]) -> Self {
        let unassigned: Vec<UnassignedResult> = tasks
            .iter()
            .map(|task| UnassignedResult {
                task_id: task.task_id,
                reason: UnassignedReason::NoSolution,
                detail: "no solution found".to_owned(),
            })
            .collect();
        Self {
            status: ResultStatus::Failed,
            message: "no solution found".to_owned(),
            kpi: SolveKpi {
                assigned_count: 0,
                unassigned_count: unassigned.len(),
                solve_duration: Duration::ZERO,
            },
            routes: Vec::new(),
            unassigned,
        }
    }

    /// True when the run produced an assignment.
    pub fn is_solved(&self) -> bool {
        self.status == ResultStatus::Solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64) -> TaskNode {
        TaskNode {
            task_id: id,
            node_id: id,
            tw_start_sec: 0,
            tw_end_sec: 86_400,
            service_time_sec: 0,
            demand: 0,
        }
    }

    #[test]
    fn no_solution_reports_every_task() {
        let tasks = vec![task(1), task(2), task(3)];
        let result = SolveResult::no_solution(&tasks);
        assert!(!result.is_solved());
        assert_eq!(result.kpi.assigned_count, 0);
        assert_eq!(result.kpi.unassigned_count, 3);
        assert!(result.routes.is_empty());
        assert!(
            result
                .unassigned
                .iter()
                .all(|u| u.reason == UnassignedReason::NoSolution)
        );
    }

    #[test]
    fn reason_codes_match_the_wire_format() {
        assert_eq!(UnassignedReason::NoSolution.as_str(), "NO_SOLUTION");
        assert_eq!(UnassignedReason::Dropped.to_string(), "DROPPED");
    }
}
