//! Solve lifecycle states shared by plans and solve jobs.
//!
//! All status changes flow through [`SolveStatus::apply`] so that the
//! submission path and the asynchronous run path agree on which transitions
//! are legal. Callers that hit a [`TransitionError`] are expected to log it
//! and leave the record untouched rather than forcing a write.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a plan or solve job.
///
/// # Examples
///
/// ```
/// use dispatch_core::{SolveEvent, SolveStatus};
///
/// let status = SolveStatus::Accepted.apply(SolveEvent::Start)?;
/// assert_eq!(status, SolveStatus::Running);
/// assert!(SolveStatus::Solved.is_terminal());
/// # Ok::<(), dispatch_core::TransitionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Provisioned but never submitted.
    Created,
    /// A submission was accepted; the solve has not started yet.
    Accepted,
    /// The asynchronous run is in progress.
    Running,
    /// Terminal: the last run produced a solution.
    Solved,
    /// Terminal: the last run failed or found no solution.
    Failed,
}

/// Events that drive status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveEvent {
    /// A submission was admitted by the idempotency gate.
    Accept,
    /// The asynchronous run picked up the job.
    Start,
    /// The run completed with a solution.
    Finish,
    /// The run ended without a solution, or with an error.
    Fail,
}

/// Returned by [`SolveStatus::apply`] for illegal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event} to a {from} record")]
pub struct TransitionError {
    /// State the record was in.
    pub from: SolveStatus,
    /// Event that was rejected.
    pub event: SolveEvent,
}

impl SolveStatus {
    /// Apply `event` and return the next state, or an error when the
    /// transition is not part of the lifecycle.
    pub fn apply(self, event: SolveEvent) -> Result<Self, TransitionError> {
        let next = match (self, event) {
            // Re-submission is allowed once the previous run is terminal.
            (Self::Created | Self::Solved | Self::Failed, SolveEvent::Accept) => Self::Accepted,
            (Self::Accepted, SolveEvent::Start) => Self::Running,
            (Self::Running, SolveEvent::Finish) => Self::Solved,
            (Self::Accepted | Self::Running, SolveEvent::Fail) => Self::Failed,
            (from, event) => return Err(TransitionError { from, event }),
        };
        Ok(next)
    }

    /// True while a submission is outstanding (`Accepted` or `Running`).
    pub fn is_active(self) -> bool {
        matches!(self, Self::Accepted | Self::Running)
    }

    /// True once a run has ended (`Solved` or `Failed`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Failed)
    }

    /// Wire code for the state, e.g. `"RUNNING"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Accepted => "ACCEPTED",
            Self::Running => "RUNNING",
            Self::Solved => "SOLVED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SolveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accept => "ACCEPT",
            Self::Start => "START",
            Self::Finish => "FINISH",
            Self::Fail => "FAIL",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SolveStatus::Created, SolveEvent::Accept, SolveStatus::Accepted)]
    #[case(SolveStatus::Solved, SolveEvent::Accept, SolveStatus::Accepted)]
    #[case(SolveStatus::Failed, SolveEvent::Accept, SolveStatus::Accepted)]
    #[case(SolveStatus::Accepted, SolveEvent::Start, SolveStatus::Running)]
    #[case(SolveStatus::Running, SolveEvent::Finish, SolveStatus::Solved)]
    #[case(SolveStatus::Accepted, SolveEvent::Fail, SolveStatus::Failed)]
    #[case(SolveStatus::Running, SolveEvent::Fail, SolveStatus::Failed)]
    fn legal_transitions(
        #[case] from: SolveStatus,
        #[case] event: SolveEvent,
        #[case] expected: SolveStatus,
    ) {
        assert_eq!(from.apply(event), Ok(expected));
    }

    #[rstest]
    #[case(SolveStatus::Accepted, SolveEvent::Accept)]
    #[case(SolveStatus::Running, SolveEvent::Accept)]
    #[case(SolveStatus::Created, SolveEvent::Start)]
    #[case(SolveStatus::Running, SolveEvent::Start)]
    #[case(SolveStatus::Accepted, SolveEvent::Finish)]
    #[case(SolveStatus::Solved, SolveEvent::Fail)]
    #[case(SolveStatus::Created, SolveEvent::Fail)]
    fn illegal_transitions(#[case] from: SolveStatus, #[case] event: SolveEvent) {
        assert_eq!(from.apply(event), Err(TransitionError { from, event }));
    }

    #[test]
    fn active_and_terminal_partition() {
        assert!(SolveStatus::Accepted.is_active());
        assert!(SolveStatus::Running.is_active());
        assert!(!SolveStatus::Created.is_active());
        assert!(SolveStatus::Solved.is_terminal());
        assert!(SolveStatus::Failed.is_terminal());
        assert!(!SolveStatus::Running.is_terminal());
    }

    #[test]
    fn serializes_to_wire_codes() {
        let json = serde_json::to_string(&SolveStatus::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
    }
}
