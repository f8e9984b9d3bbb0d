//! Error taxonomy of the orchestration layer.

use dispatch_core::{MatrixError, OptimizerError, OptionsError, PlanKey};
use thiserror::Error;

/// Errors returned by [`SolveService::submit`](crate::SolveService::submit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The submission carried malformed solve options; rejected before any
    /// job is created.
    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),
    /// The plan's lock is momentarily unattainable with no visible job, or
    /// the solver queue is full. Transient: the caller should retry; the
    /// plan itself is unaffected.
    #[error("plan is busy; retry shortly")]
    Busy,
}

/// Errors from [`ProblemAssembler::assemble`](crate::ProblemAssembler::assemble).
///
/// All of these are terminal for the solve job that hit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// The plan does not exist.
    #[error("plan {0} not found")]
    PlanNotFound(PlanKey),
    /// The (possibly filtered) vehicle set is empty.
    #[error("no available vehicles for plan {0}")]
    NoAvailableVehicles(PlanKey),
    /// The (possibly filtered) task set is empty.
    #[error("no waiting tasks for plan {0}")]
    NoWaitingTasks(PlanKey),
    /// The matrix provider failed or returned malformed matrices.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Failure of the asynchronous pipeline, mapped to a `Failed` job.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}
