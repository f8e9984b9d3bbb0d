//! Translation of optimizer output into persisted rows.

use std::sync::Arc;

use dispatch_core::{
    JobId, JobStore, NewRoute, NewRouteStop, NewUnassigned, PlanKey, PlanStore, PlanSummary,
    ResultStore, SolveEvent, SolveResult,
};

use crate::transitions::{advance_job, advance_plan_with_summary};

/// Persists a solve result and settles the owning records.
///
/// The result rows replace the plan's previous generation in one atomic
/// store operation; afterwards the plan summary and the job status are
/// updated to the terminal outcome. Both `Solved` and `Failed` results are
/// persisted, so a failed solve leaves its unassigned diagnostics queryable.
pub(crate) struct ResultPersister {
    plans: Arc<dyn PlanStore>,
    jobs: Arc<dyn JobStore>,
    results: Arc<dyn ResultStore>,
}

impl ResultPersister {
    pub(crate) fn new(
        plans: Arc<dyn PlanStore>,
        jobs: Arc<dyn JobStore>,
        results: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            plans,
            jobs,
            results,
        }
    }

    pub(crate) fn persist(&self, key: PlanKey, id: &JobId, result: &SolveResult) {
        let routes: Vec<NewRoute> = result
            .routes
            .iter()
            .map(|route| NewRoute {
                vehicle_id: route.vehicle_id,
                total_distance_m: route.total_distance_m,
                total_time_sec: route.total_time_sec,
                stops: route
                    .stops
                    .iter()
                    .map(|stop| NewRouteStop {
                        seq: stop.seq,
                        task_id: stop.task_id,
                        node_id: stop.node_id,
                        eta_sec: stop.eta_sec,
                        etd_sec: stop.etd_sec,
                        service_time_sec: stop.service_time_sec,
                    })
                    .collect(),
            })
            .collect();
        let unassigned: Vec<NewUnassigned> = result
            .unassigned
            .iter()
            .map(|item| NewUnassigned {
                task_id: item.task_id,
                reason: item.reason,
                detail: item.detail.clone(),
            })
            .collect();
        self.results.replace(key, routes, unassigned);

        let summary = PlanSummary {
            total_distance_m: result.routes.iter().map(|r| r.total_distance_m).sum(),
            total_time_sec: result.routes.iter().map(|r| r.total_time_sec).sum(),
            assigned_count: result.kpi.assigned_count,
            unassigned_count: result.kpi.unassigned_count,
            solve_duration: result.kpi.solve_duration,
        };
        let (event, message) = if result.is_solved() {
            (SolveEvent::Finish, "OK")
        } else {
            (SolveEvent::Fail, result.message.as_str())
        };
        advance_job(self.jobs.as_ref(), key, id, event, message);
        advance_plan_with_summary(self.plans.as_ref(), key, event, message, summary);
    }
}
