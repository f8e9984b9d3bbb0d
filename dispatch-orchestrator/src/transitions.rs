//! Status transitions, funneled through the shared state machine.
//!
//! Both the submission path and the asynchronous run mutate plan and job
//! status exclusively through these helpers, so transition legality is
//! checked in one place. Illegal transitions and missing records are logged
//! and leave the stored status untouched.

use dispatch_core::{JobId, JobStore, PlanKey, PlanStore, PlanSummary, SolveEvent};

pub(crate) fn advance_plan(plans: &dyn PlanStore, key: PlanKey, event: SolveEvent, message: &str) {
    let Some(plan) = plans.get(key) else {
        log::warn!("Plan {key} not found while applying {event}");
        return;
    };
    match plan.status.apply(event) {
        Ok(next) => {
            plans.set_status(key, next, message);
        }
        Err(err) => log::warn!("Plan {key}: {err}; status left unchanged"),
    }
}

pub(crate) fn advance_plan_with_summary(
    plans: &dyn PlanStore,
    key: PlanKey,
    event: SolveEvent,
    message: &str,
    summary: PlanSummary,
) {
    let Some(plan) = plans.get(key) else {
        log::warn!("Plan {key} not found while applying {event}");
        return;
    };
    match plan.status.apply(event) {
        Ok(next) => {
            plans.set_summary(key, next, message, summary);
        }
        Err(err) => log::warn!("Plan {key}: {err}; status left unchanged"),
    }
}

pub(crate) fn advance_job(
    jobs: &dyn JobStore,
    key: PlanKey,
    id: &JobId,
    event: SolveEvent,
    message: &str,
) {
    let Some(job) = jobs.get(key, id) else {
        log::warn!("Job {id} not found while applying {event}");
        return;
    };
    match job.status.apply(event) {
        Ok(next) => {
            jobs.set_status(key, id, next, message);
        }
        Err(err) => log::warn!("Job {id}: {err}; status left unchanged"),
    }
}
