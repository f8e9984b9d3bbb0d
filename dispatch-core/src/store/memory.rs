//! In-memory store implementations.
//!
//! Linear scans over mutex-guarded vectors; intended for tests and
//! single-node deployments with modest catalogs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use super::{
    JobStore, NewRoute, NewUnassigned, PlanStore, ResultStore, Route, RouteStop, TaskStore,
    UnassignedItem, VehicleStore,
};
use crate::{JobId, Plan, PlanKey, PlanSummary, SolveJob, SolveStatus, Task, Vehicle};

fn matches_filter(id: u64, ids: Option<&[u64]>) -> bool {
    ids.is_none_or(|ids| ids.contains(&id))
}

/// In-memory [`PlanStore`].
#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<PlanKey, Plan>>,
}

impl MemoryPlanStore {
    fn with_plan<R>(&self, key: PlanKey, f: impl FnOnce(&mut Plan) -> R) -> Option<R> {
        let mut plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);
        plans.get_mut(&key).map(f)
    }
}

impl PlanStore for MemoryPlanStore {
    fn get(&self, key: PlanKey) -> Option<Plan> {
        let plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);
        plans.get(&key).cloned()
    }

    fn insert(&self, plan: Plan) {
        let mut plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);
        plans.insert(plan.key, plan);
    }

    fn set_status(&self, key: PlanKey, status: SolveStatus, message: &str) -> bool {
        self.with_plan(key, |plan| {
            plan.status = status;
            plan.message = message.to_owned();
        })
        .is_some()
    }

    fn set_summary(
        &self,
        key: PlanKey,
        status: SolveStatus,
        message: &str,
        summary: PlanSummary,
    ) -> bool {
        self.with_plan(key, |plan| {
            plan.status = status;
            plan.message = message.to_owned();
            plan.summary = summary;
        })
        .is_some()
    }
}

/// In-memory [`TaskStore`].
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl TaskStore for MemoryTaskStore {
    fn insert(&self, task: Task) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.push(task);
    }

    fn waiting(&self, key: PlanKey, ids: Option<&[u64]>) -> Vec<Task> {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks
            .iter()
            .filter(|task| {
                task.tenant_id == key.tenant_id
                    && task.plan_id == key.plan_id
                    && task.state == crate::TaskState::Waiting
                    && matches_filter(task.id, ids)
            })
            .cloned()
            .collect()
    }
}

/// In-memory [`VehicleStore`].
#[derive(Default)]
pub struct MemoryVehicleStore {
    vehicles: Mutex<Vec<Vehicle>>,
}

impl VehicleStore for MemoryVehicleStore {
    fn insert(&self, vehicle: Vehicle) {
        let mut vehicles = self
            .vehicles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        vehicles.push(vehicle);
    }

    fn available(&self, tenant_id: u64, ids: Option<&[u64]>) -> Vec<Vehicle> {
        let vehicles = self
            .vehicles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        vehicles
            .iter()
            .filter(|vehicle| {
                vehicle.tenant_id == tenant_id
                    && vehicle.state == crate::VehicleState::Available
                    && matches_filter(vehicle.id, ids)
            })
            .cloned()
            .collect()
    }
}

struct JobEntry {
    job: SolveJob,
    // Write sequence; breaks same-timestamp ties in find_active.
    seq: u64,
}

/// In-memory [`JobStore`].
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<JobEntry>>,
    next_seq: AtomicU64,
}

impl MemoryJobStore {
    fn bump(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, job: SolveJob) {
        let seq = self.bump();
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.push(JobEntry { job, seq });
    }

    fn find_active(&self, key: PlanKey) -> Option<SolveJob> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.iter()
            .filter(|entry| entry.job.key == key && entry.job.status.is_active())
            .max_by_key(|entry| (entry.job.updated_at, entry.seq))
            .map(|entry| entry.job.clone())
    }

    fn get(&self, key: PlanKey, id: &JobId) -> Option<SolveJob> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.iter()
            .find(|entry| entry.job.key == key && entry.job.id == *id)
            .map(|entry| entry.job.clone())
    }

    fn set_status(&self, key: PlanKey, id: &JobId, status: SolveStatus, message: &str) -> bool {
        let seq = self.bump();
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = jobs
            .iter_mut()
            .find(|entry| entry.job.key == key && entry.job.id == *id)
        else {
            return false;
        };
        entry.job.status = status;
        entry.job.message = message.to_owned();
        entry.job.updated_at = Utc::now();
        entry.seq = seq;
        true
    }
}

struct Retirable<T> {
    row: T,
    retired: bool,
}

#[derive(Default)]
struct ResultRows {
    routes: Vec<Retirable<Route>>,
    stops: Vec<Retirable<RouteStop>>,
    unassigned: Vec<Retirable<UnassignedItem>>,
    next_id: u64,
}

impl ResultRows {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn retire(&mut self, key: PlanKey) {
        for route in &mut self.routes {
            if route.row.tenant_id == key.tenant_id && route.row.plan_id == key.plan_id {
                route.retired = true;
            }
        }
        for stop in &mut self.stops {
            if stop.row.tenant_id == key.tenant_id && stop.row.plan_id == key.plan_id {
                stop.retired = true;
            }
        }
        for item in &mut self.unassigned {
            if item.row.tenant_id == key.tenant_id && item.row.plan_id == key.plan_id {
                item.retired = true;
            }
        }
    }
}

/// In-memory [`ResultStore`].
///
/// Retired generations stay in the vectors (as an audit trail) but are
/// invisible to reads.
#[derive(Default)]
pub struct MemoryResultStore {
    rows: Mutex<ResultRows>,
}

impl ResultStore for MemoryResultStore {
    fn replace(&self, key: PlanKey, routes: Vec<NewRoute>, unassigned: Vec<NewUnassigned>) {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        // One guard spans retirement and insertion, so readers never see the
        // intermediate empty state.
        rows.retire(key);
        for route in routes {
            let route_id = rows.next_id();
            rows.routes.push(Retirable {
                row: Route {
                    id: route_id,
                    tenant_id: key.tenant_id,
                    plan_id: key.plan_id,
                    vehicle_id: route.vehicle_id,
                    total_distance_m: route.total_distance_m,
                    total_time_sec: route.total_time_sec,
                },
                retired: false,
            });
            for stop in route.stops {
                let stop_id = rows.next_id();
                rows.stops.push(Retirable {
                    row: RouteStop {
                        id: stop_id,
                        tenant_id: key.tenant_id,
                        plan_id: key.plan_id,
                        route_id,
                        seq: stop.seq,
                        task_id: stop.task_id,
                        node_id: stop.node_id,
                        eta_sec: stop.eta_sec,
                        etd_sec: stop.etd_sec,
                        service_time_sec: stop.service_time_sec,
                    },
                    retired: false,
                });
            }
        }
        for item in unassigned {
            let id = rows.next_id();
            rows.unassigned.push(Retirable {
                row: UnassignedItem {
                    id,
                    tenant_id: key.tenant_id,
                    plan_id: key.plan_id,
                    task_id: item.task_id,
                    reason: item.reason,
                    detail: item.detail,
                },
                retired: false,
            });
        }
    }

    fn routes(&self, key: PlanKey) -> Vec<Route> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let mut routes: Vec<Route> = rows
            .routes
            .iter()
            .filter(|r| {
                !r.retired && r.row.tenant_id == key.tenant_id && r.row.plan_id == key.plan_id
            })
            .map(|r| r.row.clone())
            .collect();
        routes.sort_by_key(|route| (route.vehicle_id, route.id));
        routes
    }

    fn stops(&self, key: PlanKey) -> Vec<RouteStop> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stops: Vec<RouteStop> = rows
            .stops
            .iter()
            .filter(|s| {
                !s.retired && s.row.tenant_id == key.tenant_id && s.row.plan_id == key.plan_id
            })
            .map(|s| s.row.clone())
            .collect();
        stops.sort_by_key(|stop| (stop.route_id, stop.seq));
        stops
    }

    fn unassigned(&self, key: PlanKey) -> Vec<UnassignedItem> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items: Vec<UnassignedItem> = rows
            .unassigned
            .iter()
            .filter(|u| {
                !u.retired && u.row.tenant_id == key.tenant_id && u.row.plan_id == key.plan_id
            })
            .map(|u| u.row.clone())
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewRouteStop;
    use crate::{TaskState, UnassignedReason, VehicleState};

    fn key() -> PlanKey {
        PlanKey::new(1, 1001)
    }

    fn waiting_task(id: u64) -> Task {
        Task {
            id,
            tenant_id: 1,
            plan_id: 1001,
            code: format!("TASK-{id}"),
            node_id: 100 + id,
            tw_start_sec: 0,
            tw_end_sec: 86_400,
            service_time_sec: 600,
            demand: 10,
            state: TaskState::Waiting,
        }
    }

    #[test]
    fn waiting_filters_state_plan_and_ids() {
        let store = MemoryTaskStore::default();
        store.insert(waiting_task(1));
        store.insert(Task {
            state: TaskState::Completed,
            ..waiting_task(2)
        });
        store.insert(Task {
            plan_id: 9999,
            ..waiting_task(3)
        });
        store.insert(waiting_task(4));

        let all = store.waiting(key(), None);
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 4]);

        let filtered = store.waiting(key(), Some(&[4]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 4);
    }

    #[test]
    fn available_filters_state_and_tenant() {
        let store = MemoryVehicleStore::default();
        let vehicle = |id: u64, state: VehicleState| Vehicle {
            id,
            tenant_id: 1,
            code: format!("VEH-{id}"),
            start_node_id: 1,
            end_node_id: 1,
            capacity: 100,
            work_start_sec: 0,
            work_end_sec: 86_400,
            state,
        };
        store.insert(vehicle(1, VehicleState::Available));
        store.insert(vehicle(2, VehicleState::Maintenance));
        store.insert(Vehicle {
            tenant_id: 2,
            ..vehicle(3, VehicleState::Available)
        });

        let available = store.available(1, None);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, 1);
    }

    #[test]
    fn find_active_prefers_the_most_recent_update() {
        let store = MemoryJobStore::default();
        let first = SolveJob::accepted(key(), JobId::from("solve-1-1001-a"));
        let second = SolveJob::accepted(key(), JobId::from("solve-1-1001-b"));
        store.insert(first.clone());
        store.insert(second);

        // Touching the older job makes it the most recently updated.
        assert!(store.set_status(key(), &first.id, SolveStatus::Running, "RUNNING"));
        let active = store.find_active(key()).unwrap();
        assert_eq!(active.id, first.id);
        assert_eq!(active.status, SolveStatus::Running);
    }

    #[test]
    fn terminal_jobs_are_not_active() {
        let store = MemoryJobStore::default();
        let job = SolveJob::accepted(key(), JobId::from("solve-1-1001-a"));
        store.insert(job.clone());
        assert!(store.set_status(key(), &job.id, SolveStatus::Failed, "boom"));
        assert!(store.find_active(key()).is_none());
        assert_eq!(store.get(key(), &job.id).unwrap().message, "boom");
    }

    #[test]
    fn replace_swaps_generations_atomically() {
        let store = MemoryResultStore::default();
        let route = |vehicle_id: u64, stops: Vec<NewRouteStop>| NewRoute {
            vehicle_id,
            total_distance_m: 1000,
            total_time_sec: 1800,
            stops,
        };
        let stop = |seq: u32, task_id: u64| NewRouteStop {
            seq,
            task_id,
            node_id: 100 + task_id,
            eta_sec: 3600,
            etd_sec: 4200,
            service_time_sec: 600,
        };

        store.replace(
            key(),
            vec![route(1, vec![stop(0, 1), stop(1, 2)])],
            vec![NewUnassigned {
                task_id: 3,
                reason: UnassignedReason::Dropped,
                detail: "dropped by penalty".into(),
            }],
        );
        assert_eq!(store.routes(key()).len(), 1);
        assert_eq!(store.stops(key()).len(), 2);
        assert_eq!(store.unassigned(key()).len(), 1);

        store.replace(key(), vec![route(2, vec![stop(0, 3)])], Vec::new());
        let routes = store.routes(key());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].vehicle_id, 2);
        let stops = store.stops(key());
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].route_id, routes[0].id);
        assert!(store.unassigned(key()).is_empty());
    }

    #[test]
    fn reads_are_scoped_to_the_plan() {
        let store = MemoryResultStore::default();
        store.replace(
            key(),
            vec![NewRoute {
                vehicle_id: 1,
                total_distance_m: 0,
                total_time_sec: 0,
                stops: Vec::new(),
            }],
            Vec::new(),
        );
        assert!(store.routes(PlanKey::new(1, 2)).is_empty());
        assert!(store.routes(PlanKey::new(2, 1001)).is_empty());
    }

    #[test]
    fn set_status_on_unknown_records_returns_false() {
        let plans = MemoryPlanStore::default();
        assert!(!plans.set_status(key(), SolveStatus::Accepted, "ACCEPTED"));
        let jobs = MemoryJobStore::default();
        assert!(!jobs.set_status(key(), &JobId::from("missing"), SolveStatus::Failed, ""));
    }
}
