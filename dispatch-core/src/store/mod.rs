//! Data access traits for plans, catalogs, jobs, and solve results.
//!
//! Persistence technology stays behind these traits; the in-memory
//! implementations in [`memory`](self) back tests and single-node
//! deployments. Result rows follow a replace-generation pattern: each solve
//! atomically soft-retires the previous generation and inserts the new one,
//! so readers never observe a partially written result set.

mod memory;

use serde::{Deserialize, Serialize};

pub use memory::{
    MemoryJobStore, MemoryPlanStore, MemoryResultStore, MemoryTaskStore, MemoryVehicleStore,
};

use crate::{
    JobId, Plan, PlanKey, PlanSummary, SolveJob, SolveStatus, Task, UnassignedReason, Vehicle,
};

/// Read/write access to plan records.
pub trait PlanStore: Send + Sync {
    /// Fetch a plan by key.
    fn get(&self, key: PlanKey) -> Option<Plan>;

    /// Insert or overwrite a plan record.
    fn insert(&self, plan: Plan);

    /// Update status and message; returns `false` for unknown plans.
    fn set_status(&self, key: PlanKey, status: SolveStatus, message: &str) -> bool;

    /// Update status, message, and result summary in one write; returns
    /// `false` for unknown plans.
    fn set_summary(
        &self,
        key: PlanKey,
        status: SolveStatus,
        message: &str,
        summary: PlanSummary,
    ) -> bool;
}

/// Read access to the task catalog.
pub trait TaskStore: Send + Sync {
    /// Insert a catalog entry.
    fn insert(&self, task: Task);

    /// `Waiting` tasks of a plan, optionally restricted to `ids`, in
    /// catalog order.
    fn waiting(&self, key: PlanKey, ids: Option<&[u64]>) -> Vec<Task>;
}

/// Read access to the vehicle catalog.
pub trait VehicleStore: Send + Sync {
    /// Insert a catalog entry.
    fn insert(&self, vehicle: Vehicle);

    /// `Available` vehicles of a tenant, optionally restricted to `ids`, in
    /// catalog order.
    fn available(&self, tenant_id: u64, ids: Option<&[u64]>) -> Vec<Vehicle>;
}

/// Durable record of solve attempts.
pub trait JobStore: Send + Sync {
    /// Record a new job.
    fn insert(&self, job: SolveJob);

    /// The most recently updated job of the plan still in `Accepted` or
    /// `Running`, if any. This query backs the idempotency gate.
    fn find_active(&self, key: PlanKey) -> Option<SolveJob>;

    /// Fetch one job by plan and identifier.
    fn get(&self, key: PlanKey, id: &JobId) -> Option<SolveJob>;

    /// Update status and message, refreshing the update timestamp; returns
    /// `false` for unknown jobs.
    fn set_status(&self, key: PlanKey, id: &JobId, status: SolveStatus, message: &str) -> bool;
}

/// A persisted vehicle route, one generation per solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Store-assigned row id.
    pub id: u64,
    /// Owning tenant.
    pub tenant_id: u64,
    /// Owning plan.
    pub plan_id: u64,
    /// Vehicle the route belongs to.
    pub vehicle_id: u64,
    /// Route distance in meters.
    pub total_distance_m: i64,
    /// Route duration in seconds.
    pub total_time_sec: i64,
}

/// A persisted stop within a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Store-assigned row id.
    pub id: u64,
    /// Owning tenant.
    pub tenant_id: u64,
    /// Owning plan.
    pub plan_id: u64,
    /// Route row the stop belongs to.
    pub route_id: u64,
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

/// A persisted unassigned-task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedItem {
    /// Store-assigned row id.
    pub id: u64,
    /// Owning tenant.
    pub tenant_id: u64,
    /// Owning plan.
    pub plan_id: u64,
    /// Task that was not served.
    pub task_id: u64,
    /// Machine-readable reason.
    pub reason: UnassignedReason,
    /// Free-text detail for operators.
    pub detail: String,
}

/// New-generation route awaiting insertion; the store assigns row ids and
/// links the nested stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    /// Vehicle the route belongs to.
    pub vehicle_id: u64,
    /// Route distance in meters.
    pub total_distance_m: i64,
    /// Route duration in seconds.
    pub total_time_sec: i64,
    /// Ordered stops.
    pub stops: Vec<NewRouteStop>,
}

/// New-generation stop awaiting insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRouteStop {
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

/// New-generation unassigned record awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnassigned {
    /// Task that was not served.
    pub task_id: u64,
    /// Machine-readable reason.
    pub reason: UnassignedReason,
    /// Free-text detail for operators.
    pub detail: String,
}

/// Persisted solve results with replace-generation semantics.
pub trait ResultStore: Send + Sync {
    /// Atomically soft-retire every live route, stop, and unassigned row of
    /// the plan, then insert the new generation. Readers observe either the
    /// old generation or the new one, never a mixture.
    fn replace(&self, key: PlanKey, routes: Vec<NewRoute>, unassigned: Vec<NewUnassigned>);

    /// Live routes of the plan, ordered by vehicle id.
    fn routes(&self, key: PlanKey) -> Vec<Route>;

    /// Live stops of the plan, ordered by route then sequence.
    fn stops(&self, key: PlanKey) -> Vec<RouteStop>;

    /// Live unassigned records of the plan, in insertion order.
    fn unassigned(&self, key: PlanKey) -> Vec<UnassignedItem>;
}
