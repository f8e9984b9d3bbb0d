//! Insertion-based routing optimizer for the dispatch engine.
//!
//! This crate provides [`InsertionOptimizer`], the default implementation of
//! the [`RoutingOptimizer`](dispatch_core::RoutingOptimizer) contract. It
//! builds routes by parallel cheapest insertion: every round it evaluates all
//! (task, vehicle, position) candidates and commits the feasible insertion
//! with the smallest distance increase, until nothing feasible remains or the
//! wall-clock budget runs out.
//!
//! The engine is deliberately small and deterministic; deployments with
//! heavier workloads can swap in a metaheuristic or an external solver
//! through the same trait without touching the orchestration layer.

#![forbid(unsafe_code)]

mod schedule;

use std::time::{Duration, Instant};

use dispatch_core::{
    OptimizerError, ResultStatus, RouteResult, RoutingOptimizer, RoutingProblem, SolveKpi,
    SolveResult, StopResult, TaskNode, UnassignedReason, UnassignedResult,
};

use crate::schedule::{RouteSchedule, evaluate};

/// Configuration for [`InsertionOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionConfig {
    /// Longest a vehicle may idle ahead of a task's window before the visit
    /// is considered infeasible.
    pub wait_slack: Duration,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            wait_slack: Duration::from_secs(30 * 60),
        }
    }
}

/// Deterministic cheapest-insertion construction engine.
///
/// A feasible insertion is always preferred to dropping a task; the drop
/// disjunction only applies to tasks no vehicle can serve. Ties between
/// candidates resolve to the lowest vehicle index, then the earliest
/// position, so identical problems yield identical solutions.
#[derive(Debug, Clone, Default)]
pub struct InsertionOptimizer {
    config: InsertionConfig,
}

/// One committed insertion candidate.
struct Insertion {
    pending_index: usize,
    vehicle_index: usize,
    position: usize,
    added_distance: i64,
    schedule: RouteSchedule,
}

impl InsertionOptimizer {
    /// An optimizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An optimizer with explicit configuration.
    pub fn with_config(config: InsertionConfig) -> Self {
        Self { config }
    }

    fn check_contract(problem: &RoutingProblem) -> Result<(), OptimizerError> {
        problem
            .matrices
            .validate(problem.nodes.len())
            .map_err(|e| OptimizerError::MalformedProblem(e.to_string()))?;
        for vehicle in &problem.vehicles {
            let indexed = problem.nodes.index_of(vehicle.start_node_id).is_some()
                && problem.nodes.index_of(vehicle.end_node_id).is_some();
            if !indexed {
                return Err(OptimizerError::MalformedProblem(format!(
                    "vehicle {} depot is not in the node index",
                    vehicle.vehicle_id
                )));
            }
        }
        Ok(())
    }
}

impl RoutingOptimizer for InsertionOptimizer {
    fn solve(&self, problem: &RoutingProblem) -> Result<SolveResult, OptimizerError> {
        let started = Instant::now();
        Self::check_contract(problem)?;

        if problem.vehicles.is_empty() || problem.tasks.is_empty() {
            let mut result = SolveResult::no_solution(&problem.tasks);
            result.kpi.solve_duration = started.elapsed();
            return Ok(result);
        }

        let deadline = started + problem.options.time_limit;
        let wait_slack_sec = self.config.wait_slack.as_secs() as i64;

        // Tasks whose node never made it into the index cannot be routed;
        // given the assembler's construction order this indicates a broken
        // encoding upstream.
        let mut pending: Vec<&TaskNode> = Vec::new();
        let mut unmapped: Vec<&TaskNode> = Vec::new();
        for task in &problem.tasks {
            if problem.nodes.index_of(task.node_id).is_some() {
                pending.push(task);
            } else {
                log::warn!(
                    "Task {} references node {} missing from the index; skipping",
                    task.task_id,
                    task.node_id
                );
                debug_assert!(false, "task {} node missing from index", task.task_id);
                unmapped.push(task);
            }
        }

        let vehicle_count = problem.vehicles.len();
        let mut routes: Vec<Vec<&TaskNode>> = vec![Vec::new(); vehicle_count];
        let mut schedules: Vec<Option<RouteSchedule>> = problem
            .vehicles
            .iter()
            .map(|vehicle| evaluate(vehicle, &[], problem, wait_slack_sec))
            .collect();

        while !pending.is_empty() && Instant::now() < deadline {
            let mut best: Option<Insertion> = None;
            for (pending_index, task) in pending.iter().enumerate() {
                for (vehicle_index, vehicle) in problem.vehicles.iter().enumerate() {
                    // A vehicle whose empty route is already infeasible
                    // (e.g. its shift cannot cover the depot leg) serves
                    // nothing.
                    let Some(current) = &schedules[vehicle_index] else {
                        continue;
                    };
                    for position in 0..=routes[vehicle_index].len() {
                        let mut candidate = routes[vehicle_index].clone();
                        candidate.insert(position, *task);
                        let Some(schedule) =
                            evaluate(vehicle, &candidate, problem, wait_slack_sec)
                        else {
                            continue;
                        };
                        let added_distance =
                            schedule.total_distance_m - current.total_distance_m;
                        if best
                            .as_ref()
                            .is_none_or(|b| added_distance < b.added_distance)
                        {
                            best = Some(Insertion {
                                pending_index,
                                vehicle_index,
                                position,
                                added_distance,
                                schedule,
                            });
                        }
                    }
                }
            }
            let Some(insertion) = best else {
                break;
            };
            let task = pending.remove(insertion.pending_index);
            routes[insertion.vehicle_index].insert(insertion.position, task);
            schedules[insertion.vehicle_index] = Some(insertion.schedule);
        }

        let leftovers: Vec<&TaskNode> = pending.into_iter().chain(unmapped).collect();
        if !leftovers.is_empty() && !problem.options.allow_drop {
            let mut result = SolveResult::no_solution(&problem.tasks);
            result.kpi.solve_duration = started.elapsed();
            return Ok(result);
        }

        let mut assigned_count = 0_usize;
        let mut route_results = Vec::with_capacity(vehicle_count);
        for (vehicle, (sequence, schedule)) in problem
            .vehicles
            .iter()
            .zip(routes.iter().zip(schedules.iter()))
        {
            let mut route = RouteResult {
                vehicle_id: vehicle.vehicle_id,
                total_distance_m: 0,
                total_time_sec: 0,
                stops: Vec::new(),
            };
            if let (false, Some(schedule)) = (sequence.is_empty(), schedule) {
                assigned_count += sequence.len();
                route.total_distance_m = schedule.total_distance_m;
                route.total_time_sec = schedule.total_time_sec;
                route.stops = sequence
                    .iter()
                    .zip(&schedule.timings)
                    .enumerate()
                    .map(|(i, (task, timing))| StopResult {
                        seq: i as u32,
                        task_id: task.task_id,
                        node_id: task.node_id,
                        eta_sec: timing.eta_sec,
                        etd_sec: timing.etd_sec,
                        service_time_sec: task.service_time_sec,
                    })
                    .collect();
            }
            route_results.push(route);
        }

        let unassigned: Vec<UnassignedResult> = leftovers
            .iter()
            .map(|task| UnassignedResult {
                task_id: task.task_id,
                reason: UnassignedReason::Dropped,
                detail: "dropped by penalty".to_owned(),
            })
            .collect();

        Ok(SolveResult {
            status: ResultStatus::Solved,
            message: "OK".to_owned(),
            kpi: SolveKpi {
                assigned_count,
                unassigned_count: unassigned.len(),
                solve_duration: started.elapsed(),
            },
            routes: route_results,
            unassigned,
        })
    }
}
