//! The solve service: idempotent submission, async execution, and queries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use dispatch_core::{
    JobId, JobStore, LockGuard, LockService, MatrixProvider, MemoryJobStore, MemoryLockService,
    MemoryPlanStore, MemoryResultStore, MemoryTaskStore, MemoryVehicleStore, Plan, PlanKey,
    PlanStore, ResultStore, Route, RouteStop, RoutingOptimizer, SolveEvent, SolveJob,
    SolveOptions, SolveStatus, TaskStore, UnassignedItem, VehicleStore, solve_lock_key,
};

use crate::assembler::ProblemAssembler;
use crate::error::SubmitError;
use crate::fabric::{FabricConfig, SolveFabric, SolveTicket};
use crate::persister::ResultPersister;
use crate::runner::SolveRunner;
use crate::transitions::{advance_job, advance_plan};

/// A request to solve one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Plan to solve.
    pub key: PlanKey,
    /// Restrict the solve to these tasks; `None` means every waiting task.
    pub task_ids: Option<Vec<u64>>,
    /// Restrict the solve to these vehicles; `None` means every available
    /// vehicle.
    pub vehicle_ids: Option<Vec<u64>>,
    /// Explicit solve options; `None` falls back to the plan's stored
    /// configuration.
    pub options: Option<SolveOptions>,
}

impl SolveRequest {
    /// An unfiltered request using the plan's stored options.
    pub fn for_plan(key: PlanKey) -> Self {
        Self {
            key,
            task_ids: None,
            vehicle_ids: None,
            options: None,
        }
    }
}

/// The store bundle the engine operates on.
#[derive(Clone)]
pub struct EngineStores {
    /// Plan records.
    pub plans: Arc<dyn PlanStore>,
    /// Task catalog.
    pub tasks: Arc<dyn TaskStore>,
    /// Vehicle catalog.
    pub vehicles: Arc<dyn VehicleStore>,
    /// Solve job records.
    pub jobs: Arc<dyn JobStore>,
    /// Persisted solve results.
    pub results: Arc<dyn ResultStore>,
}

impl EngineStores {
    /// Fresh in-memory stores, for tests and single-node deployments.
    pub fn in_memory() -> Self {
        Self {
            plans: Arc::new(MemoryPlanStore::default()),
            tasks: Arc::new(MemoryTaskStore::default()),
            vehicles: Arc::new(MemoryVehicleStore::default()),
            jobs: Arc::new(MemoryJobStore::default()),
            results: Arc::new(MemoryResultStore::default()),
        }
    }
}

/// A persisted route together with its ordered stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRoute {
    /// The route row.
    pub route: Route,
    /// Stops in visit order.
    pub stops: Vec<RouteStop>,
}

/// Front door of the orchestration layer.
///
/// Submission is idempotent per plan: while a job is `Accepted` or
/// `Running`, every further submission returns that job's id. The plan lock
/// is the source of truth for "at most one active solve per plan"; its
/// ownership transfers from [`SolveService::submit`] into the enqueued run,
/// which releases it on every exit path.
pub struct SolveService {
    stores: EngineStores,
    lock: Arc<dyn LockService>,
    lock_lease: Duration,
    fabric: SolveFabric,
}

impl SolveService {
    /// Wire a service over stores, a matrix provider, an optimizer, and a
    /// lock service, and start its worker fabric.
    pub fn new(
        stores: EngineStores,
        matrix: Arc<dyn MatrixProvider>,
        optimizer: Arc<dyn RoutingOptimizer>,
        lock: Arc<dyn LockService>,
        config: FabricConfig,
    ) -> Self {
        let assembler = ProblemAssembler::new(
            stores.plans.clone(),
            stores.tasks.clone(),
            stores.vehicles.clone(),
            matrix,
        );
        let persister = ResultPersister::new(
            stores.plans.clone(),
            stores.jobs.clone(),
            stores.results.clone(),
        );
        let runner = Arc::new(SolveRunner::new(
            stores.plans.clone(),
            stores.jobs.clone(),
            assembler,
            optimizer,
            persister,
        ));
        let fabric = SolveFabric::start(&config, runner);
        Self {
            stores,
            lock,
            lock_lease: config.lock_lease,
            fabric,
        }
    }

    /// A service over fresh in-memory stores and the in-process lock.
    pub fn in_memory(
        matrix: Arc<dyn MatrixProvider>,
        optimizer: Arc<dyn RoutingOptimizer>,
    ) -> Self {
        Self::new(
            EngineStores::in_memory(),
            matrix,
            optimizer,
            Arc::new(MemoryLockService::default()),
            FabricConfig::default(),
        )
    }

    /// Submit a solve for a plan.
    ///
    /// Returns the identifier of the job that is (now or already) working
    /// on the plan. Fails with [`SubmitError::InvalidOptions`] before any
    /// job is created, or with [`SubmitError::Busy`] when the plan's lock is
    /// transiently unattainable; the caller should retry.
    pub fn submit(&self, request: SolveRequest) -> Result<JobId, SubmitError> {
        if let Some(options) = &request.options {
            options.validate()?;
        }
        let key = request.key;
        log::info!("Solve submission for plan {key}");

        if let Some(job) = self.stores.jobs.find_active(key) {
            log::info!("Reusing active job {} for plan {key}", job.id);
            return Ok(job.id);
        }

        let Some(token) = self
            .lock
            .try_acquire(&solve_lock_key(key), Some(self.lock_lease))
        else {
            // Another process holds the lock; it may have just created the
            // job, so close the race with one more lookup.
            if let Some(job) = self.stores.jobs.find_active(key) {
                log::info!("Reusing concurrently created job {} for plan {key}", job.id);
                return Ok(job.id);
            }
            log::warn!("Plan {key} is locked with no visible job; caller should retry");
            return Err(SubmitError::Busy);
        };
        let guard = LockGuard::new(self.lock.clone(), token);

        let id = JobId::generate(key);
        self.stores.jobs.insert(SolveJob::accepted(key, id.clone()));
        advance_plan(
            self.stores.plans.as_ref(),
            key,
            SolveEvent::Accept,
            SolveStatus::Accepted.as_str(),
        );

        let ticket = SolveTicket {
            request,
            id: id.clone(),
            guard,
        };
        if let Err(ticket) = self.fabric.enqueue(ticket) {
            let message = "solver queue full";
            log::warn!("Rejected job {} for plan {key}: {message}", ticket.id);
            advance_job(
                self.stores.jobs.as_ref(),
                key,
                &ticket.id,
                SolveEvent::Fail,
                message,
            );
            advance_plan(self.stores.plans.as_ref(), key, SolveEvent::Fail, message);
            // Dropping the ticket releases the plan lock.
            drop(ticket);
            return Err(SubmitError::Busy);
        }

        log::info!("Accepted job {id} for plan {key}");
        Ok(id)
    }

    /// Status of one job, or `None` when no matching job exists.
    pub fn job_status(&self, key: PlanKey, id: &JobId) -> Option<SolveJob> {
        self.stores.jobs.get(key, id)
    }

    /// The plan record, if provisioned.
    pub fn plan(&self, key: PlanKey) -> Option<Plan> {
        self.stores.plans.get(key)
    }

    /// The plan's current routes with their stops, ordered by vehicle.
    pub fn routes(&self, key: PlanKey) -> Vec<PlanRoute> {
        let mut grouped: HashMap<u64, Vec<RouteStop>> = HashMap::new();
        for stop in self.stores.results.stops(key) {
            grouped.entry(stop.route_id).or_default().push(stop);
        }
        self.stores
            .results
            .routes(key)
            .into_iter()
            .map(|route| PlanRoute {
                stops: grouped.remove(&route.id).unwrap_or_default(),
                route,
            })
            .collect()
    }

    /// The plan's current unassigned records.
    pub fn unassigned(&self, key: PlanKey) -> Vec<UnassignedItem> {
        self.stores.results.unassigned(key)
    }
}
