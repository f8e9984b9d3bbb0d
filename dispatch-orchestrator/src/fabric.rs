//! Bounded worker pool running solve pipelines off the request path.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dispatch_core::{JobId, LockGuard};

use crate::runner::SolveRunner;
use crate::service::SolveRequest;

/// Sizing and lease configuration of the execution fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FabricConfig {
    /// Worker threads consuming the queue.
    pub workers: usize,
    /// Submissions that may wait for a worker before the gate reports busy.
    pub queue_depth: usize,
    /// Lease requested for the plan lock at submission; bounds orphaned
    /// locks if the process dies mid-solve.
    pub lock_lease: Duration,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_depth: 200,
            lock_lease: Duration::from_secs(60),
        }
    }
}

/// One enqueued solve: the request, its job, and the plan lock whose
/// ownership travels with the work item until the run releases it.
pub(crate) struct SolveTicket {
    pub(crate) request: SolveRequest,
    pub(crate) id: JobId,
    pub(crate) guard: LockGuard,
}

/// Fixed worker pool over a bounded queue.
///
/// Dropping the fabric closes the queue and joins the workers, letting
/// in-flight runs finish.
pub(crate) struct SolveFabric {
    sender: Option<SyncSender<SolveTicket>>,
    workers: Vec<JoinHandle<()>>,
}

impl SolveFabric {
    pub(crate) fn start(config: &FabricConfig, runner: Arc<SolveRunner>) -> Self {
        let (sender, receiver) = sync_channel(config.queue_depth);
        let receiver = Arc::new(Mutex::new(receiver));
        let mut workers = Vec::with_capacity(config.workers);
        for i in 0..config.workers {
            let receiver: Arc<Mutex<Receiver<SolveTicket>>> = Arc::clone(&receiver);
            let runner = Arc::clone(&runner);
            let spawned = thread::Builder::new()
                .name(format!("solve-{i}"))
                .spawn(move || {
                    loop {
                        let ticket = {
                            let Ok(receiver) = receiver.lock() else {
                                break;
                            };
                            receiver.recv()
                        };
                        match ticket {
                            Ok(ticket) => runner.run(ticket),
                            // Queue closed: the fabric is shutting down.
                            Err(_) => break,
                        }
                    }
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => log::error!("Failed to spawn solve worker {i}: {err}"),
            }
        }
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Non-blocking enqueue; hands the ticket back when the queue is full
    /// or closed, so the caller can fail the job and free its lock.
    pub(crate) fn enqueue(&self, ticket: SolveTicket) -> Result<(), SolveTicket> {
        let Some(sender) = &self.sender else {
            return Err(ticket);
        };
        sender.try_send(ticket).map_err(|err| match err {
            TrySendError::Full(ticket) | TrySendError::Disconnected(ticket) => ticket,
        })
    }
}

impl Drop for SolveFabric {
    fn drop(&mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("A solve worker exited by panic");
            }
        }
    }
}
