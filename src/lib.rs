//! Facade crate for the dispatch solve engine.
//!
//! This crate re-exports the core domain types, the orchestration service,
//! and exposes the default routing optimizer behind a feature flag.

#![forbid(unsafe_code)]

pub use dispatch_core::{
    JobId, JobStore, LinearMatrixProvider, LockGuard, LockService, LockToken, Matrix,
    MatrixError, MatrixProvider, MemoryJobStore, MemoryLockService, MemoryPlanStore,
    MemoryResultStore, MemoryTaskStore, MemoryVehicleStore, NewRoute, NewRouteStop,
    NewUnassigned, NodeIndex, OptimizerError, OptionsError, Plan, PlanKey, PlanStore,
    PlanSummary, ResultStatus, ResultStore, Route, RouteResult, RouteStop, RoutingOptimizer,
    RoutingProblem, SolveEvent, SolveJob, SolveKpi, SolveOptions, SolveResult, SolveStatus,
    StopResult, Task, TaskNode, TaskState, TaskStore, TransitionError, TravelMatrices,
    UnassignedItem, UnassignedReason, UnassignedResult, Vehicle, VehicleResource, VehicleState,
    VehicleStore, solve_lock_key,
};

pub use dispatch_orchestrator::{
    AssemblyError, EngineStores, FabricConfig, PlanRoute, ProblemAssembler, SolveRequest,
    SolveService, SubmitError,
};

#[cfg(feature = "test-support")]
pub use dispatch_core::test_support;

#[cfg(feature = "solver-insertion")]
pub use dispatch_solver_insertion::{InsertionConfig, InsertionOptimizer};
