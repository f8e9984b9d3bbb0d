//! Test-only fixtures and optimizer doubles shared across the workspace.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::{
    OptimizerError, Plan, PlanKey, ResultStatus, RouteResult, RoutingOptimizer, RoutingProblem,
    SolveKpi, SolveResult, StopResult, Task, TaskState, Vehicle, VehicleState,
};

/// One-shot gate for holding a [`StubOptimizer`] mid-solve.
///
/// Tests open the latch to let a blocked solve proceed, which makes
/// "job still running" scenarios deterministic.
#[derive(Default)]
pub struct Latch {
    opened: Mutex<bool>,
    signal: Condvar,
}

impl Latch {
    /// A closed latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the latch, waking every waiter.
    pub fn open(&self) {
        let mut opened = self.opened.lock().unwrap_or_else(PoisonError::into_inner);
        *opened = true;
        self.signal.notify_all();
    }

    /// Block until the latch is opened.
    pub fn wait(&self) {
        let mut opened = self.opened.lock().unwrap_or_else(PoisonError::into_inner);
        while !*opened {
            opened = self
                .signal
                .wait(opened)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// What a [`StubOptimizer`] does when asked to solve.
pub enum StubBehavior {
    /// Put every task on the first vehicle, in input order.
    AssignAll,
    /// Report the no-solution outcome.
    NoSolution,
    /// Panic, exercising the unexpected-failure path.
    Panic,
    /// Wait for the latch, then assign every task.
    Block(std::sync::Arc<Latch>),
}

/// Deterministic [`RoutingOptimizer`] double for orchestration tests.
pub struct StubOptimizer {
    behavior: StubBehavior,
}

impl StubOptimizer {
    /// A stub with the given behavior.
    pub fn new(behavior: StubBehavior) -> Self {
        Self { behavior }
    }

    /// Shorthand for [`StubBehavior::AssignAll`].
    pub fn assign_all() -> Self {
        Self::new(StubBehavior::AssignAll)
    }

    fn assign_everything(problem: &RoutingProblem) -> SolveResult {
        let mut routes: Vec<RouteResult> = problem
            .vehicles
            .iter()
            .map(|vehicle| RouteResult {
                vehicle_id: vehicle.vehicle_id,
                total_distance_m: 0,
                total_time_sec: 0,
                stops: Vec::new(),
            })
            .collect();
        if let Some(first) = routes.first_mut() {
            first.stops = problem
                .tasks
                .iter()
                .enumerate()
                .map(|(i, task)| StopResult {
                    seq: i as u32,
                    task_id: task.task_id,
                    node_id: task.node_id,
                    eta_sec: task.tw_start_sec,
                    etd_sec: task.tw_start_sec + task.service_time_sec,
                    service_time_sec: task.service_time_sec,
                })
                .collect();
            first.total_distance_m = 1000 * first.stops.len() as i64;
        }
        SolveResult {
            status: ResultStatus::Solved,
            message: "OK".to_owned(),
            kpi: SolveKpi {
                assigned_count: problem.tasks.len(),
                unassigned_count: 0,
                solve_duration: Duration::ZERO,
            },
            routes,
            unassigned: Vec::new(),
        }
    }
}

impl RoutingOptimizer for StubOptimizer {
    fn solve(&self, problem: &RoutingProblem) -> Result<SolveResult, OptimizerError> {
        match &self.behavior {
            StubBehavior::AssignAll => Ok(Self::assign_everything(problem)),
            StubBehavior::NoSolution => Ok(SolveResult::no_solution(&problem.tasks)),
            StubBehavior::Panic => panic!("stub optimizer asked to panic"),
            StubBehavior::Block(latch) => {
                latch.wait();
                Ok(Self::assign_everything(problem))
            }
        }
    }
}

/// A plan named after its key, in `Created` state.
pub fn sample_plan(key: PlanKey) -> Plan {
    Plan::new(key, format!("PLAN-{}", key.plan_id))
}

/// An available vehicle with a shared depot, generous capacity, and a full
/// working day.
pub fn sample_vehicle(id: u64, tenant_id: u64) -> Vehicle {
    Vehicle {
        id,
        tenant_id,
        code: format!("VEH-{id}"),
        start_node_id: 1,
        end_node_id: 1,
        capacity: 100,
        work_start_sec: 0,
        work_end_sec: 86_400,
        state: VehicleState::Available,
    }
}

/// A waiting task with a wide-open window and small demand.
pub fn sample_task(id: u64, key: PlanKey, node_id: u64) -> Task {
    Task {
        id,
        tenant_id: key.tenant_id,
        plan_id: key.plan_id,
        code: format!("TASK-{id}"),
        node_id,
        tw_start_sec: 0,
        tw_end_sec: 86_400,
        service_time_sec: 600,
        demand: 10,
        state: TaskState::Waiting,
    }
}
