//! Solve jobs: one asynchronous attempt to solve a plan.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PlanKey, SolveStatus};

/// Opaque identifier for a solve job, unique per plan across time.
///
/// Generated as `solve-{tenant}-{plan}-{uuid}`; the random suffix makes
/// same-instant submissions for different plans collision-free.
///
/// # Examples
///
/// ```
/// use dispatch_core::{JobId, PlanKey};
///
/// let id = JobId::generate(PlanKey::new(1, 1001));
/// assert!(id.as_str().starts_with("solve-1-1001-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Mint a fresh identifier for a submission on `key`.
    pub fn generate(key: PlanKey) -> Self {
        Self(format!(
            "solve-{}-{}-{}",
            key.tenant_id,
            key.plan_id,
            Uuid::new_v4().simple()
        ))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One submission attempt for a plan.
///
/// Multiple jobs may exist per plan historically; at most one may be
/// `Accepted` or `Running` at a time. Jobs are soft-retired, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveJob {
    /// Plan the job belongs to.
    pub key: PlanKey,
    /// Globally unique job identifier.
    pub id: JobId,
    /// Lifecycle state, mirroring the plan's machine.
    pub status: SolveStatus,
    /// Last status message.
    pub message: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl SolveJob {
    /// A freshly accepted job for `key`.
    pub fn accepted(key: PlanKey, id: JobId) -> Self {
        let now = Utc::now();
        Self {
            key,
            id,
            status: SolveStatus::Accepted,
            message: SolveStatus::Accepted.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_carry_the_plan_scope() {
        let id = JobId::generate(PlanKey::new(7, 99));
        assert!(id.as_str().starts_with("solve-7-99-"));
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let key = PlanKey::new(1, 1);
        let ids: HashSet<_> = (0..64).map(|_| JobId::generate(key)).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn accepted_job_starts_active() {
        let job = SolveJob::accepted(PlanKey::new(1, 2), JobId::from("solve-1-2-x"));
        assert!(job.status.is_active());
        assert_eq!(job.message, "ACCEPTED");
        assert_eq!(job.created_at, job.updated_at);
    }
}
