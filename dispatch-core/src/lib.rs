//! Core domain types and trait seams for the dispatch solve engine.
//!
//! This crate defines the entities shared by the orchestration and solver
//! layers: plans, solve jobs, task and vehicle catalogs, the normalized
//! routing-problem encoding, and the optimizer result model. The seams
//! ([`RoutingOptimizer`], [`MatrixProvider`], [`LockService`], and the store
//! traits) keep search engines, matrix services, and persistence technology
//! swappable without touching the orchestration logic.
//!
//! In-memory reference implementations of the stores and the lock service are
//! included; production deployments substitute their own through the same
//! traits.

#![forbid(unsafe_code)]

mod job;
pub mod lock;
pub mod matrix;
mod optimizer;
mod options;
mod plan;
mod problem;
mod result;
mod status;
pub mod store;
mod task;
mod vehicle;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use job::{JobId, SolveJob};
pub use lock::{LockGuard, LockService, LockToken, MemoryLockService, solve_lock_key};
pub use matrix::{LinearMatrixProvider, Matrix, MatrixError, MatrixProvider, TravelMatrices};
pub use optimizer::{OptimizerError, RoutingOptimizer};
pub use options::{OptionsError, SolveOptions};
pub use plan::{Plan, PlanKey, PlanSummary};
pub use problem::{NodeIndex, RoutingProblem};
pub use result::{
    ResultStatus, RouteResult, SolveKpi, SolveResult, StopResult, UnassignedReason,
    UnassignedResult,
};
pub use status::{SolveEvent, SolveStatus, TransitionError};
pub use store::{
    JobStore, MemoryJobStore, MemoryPlanStore, MemoryResultStore, MemoryTaskStore,
    MemoryVehicleStore, NewRoute, NewRouteStop, NewUnassigned, PlanStore, ResultStore, Route,
    RouteStop, TaskStore, UnassignedItem, VehicleStore,
};
pub use task::{Task, TaskNode, TaskState};
pub use vehicle::{Vehicle, VehicleResource, VehicleState};
