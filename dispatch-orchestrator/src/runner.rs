//! The assemble → solve → persist pipeline executed by fabric workers.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use dispatch_core::{
    JobId, JobStore, PlanStore, RoutingOptimizer, SolveEvent, SolveStatus,
};

use crate::assembler::ProblemAssembler;
use crate::error::PipelineError;
use crate::fabric::SolveTicket;
use crate::persister::ResultPersister;
use crate::service::SolveRequest;
use crate::transitions::{advance_job, advance_plan};

/// Runs one solve end to end, settling status and releasing the lock on
/// every exit path.
pub(crate) struct SolveRunner {
    plans: Arc<dyn PlanStore>,
    jobs: Arc<dyn JobStore>,
    assembler: ProblemAssembler,
    optimizer: Arc<dyn RoutingOptimizer>,
    persister: ResultPersister,
}

impl SolveRunner {
    pub(crate) fn new(
        plans: Arc<dyn PlanStore>,
        jobs: Arc<dyn JobStore>,
        assembler: ProblemAssembler,
        optimizer: Arc<dyn RoutingOptimizer>,
        persister: ResultPersister,
    ) -> Self {
        Self {
            plans,
            jobs,
            assembler,
            optimizer,
            persister,
        }
    }

    pub(crate) fn run(&self, ticket: SolveTicket) {
        let SolveTicket { request, id, guard } = ticket;
        let key = request.key;
        let started = Instant::now();

        advance_job(
            self.jobs.as_ref(),
            key,
            &id,
            SolveEvent::Start,
            SolveStatus::Running.as_str(),
        );
        advance_plan(
            self.plans.as_ref(),
            key,
            SolveEvent::Start,
            SolveStatus::Running.as_str(),
        );
        log::info!("Solve started for plan {key}, job {id}");

        // The panic boundary keeps a crashing optimizer from wedging the
        // job in Running; the guard below frees the lock either way.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(&request, &id, started)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                let message = err.to_string();
                log::error!("Solve failed for plan {key}, job {id}: {message}");
                advance_job(self.jobs.as_ref(), key, &id, SolveEvent::Fail, &message);
                advance_plan(self.plans.as_ref(), key, SolveEvent::Fail, &message);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Solve panicked for plan {key}, job {id}: {message}");
                advance_job(self.jobs.as_ref(), key, &id, SolveEvent::Fail, &message);
                advance_plan(self.plans.as_ref(), key, SolveEvent::Fail, &message);
            }
        }

        drop(guard);
        log::info!("Released solve lock for plan {key}");
    }

    fn execute(
        &self,
        request: &SolveRequest,
        id: &JobId,
        started: Instant,
    ) -> Result<(), PipelineError> {
        let problem = self.assembler.assemble(request)?;
        let mut result = self.optimizer.solve(&problem)?;
        result.kpi.solve_duration = started.elapsed();
        self.persister.persist(request.key, id, &result);
        log::info!(
            "Solve finished for plan {}: status={:?}, assigned={}, unassigned={}, took {:?}",
            request.key,
            result.status,
            result.kpi.assigned_count,
            result.kpi.unassigned_count,
            result.kpi.solve_duration
        );
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unidentified panic".to_owned())
}
