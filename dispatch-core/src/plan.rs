//! Plans: tenant-scoped units of dispatch work.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{SolveOptions, SolveStatus};

/// Identifies a plan within its tenant.
///
/// The pair travels together everywhere a plan is scoped: store lookups,
/// lock keys, and log context.
///
/// # Examples
///
/// ```
/// use dispatch_core::PlanKey;
///
/// let key = PlanKey::new(1, 1001);
/// assert_eq!(key.to_string(), "1:1001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanKey {
    /// Owning tenant.
    pub tenant_id: u64,
    /// Plan within the tenant.
    pub plan_id: u64,
}

impl PlanKey {
    /// Pair a tenant id with a plan id.
    pub fn new(tenant_id: u64, plan_id: u64) -> Self {
        Self { tenant_id, plan_id }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tenant_id, self.plan_id)
    }
}

/// Latest result summary, refreshed on every terminal run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Sum of route distances in meters.
    pub total_distance_m: i64,
    /// Sum of route durations in seconds.
    pub total_time_sec: i64,
    /// Tasks placed on a route.
    pub assigned_count: usize,
    /// Tasks left off every route.
    pub unassigned_count: usize,
    /// Wall-clock duration of the solve pipeline.
    pub solve_duration: Duration,
}

/// A unit of dispatch work subject to solving.
///
/// Plans are provisioned externally; the orchestration layer only mutates
/// status, message, and summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Tenant/plan identity.
    pub key: PlanKey,
    /// Human-readable plan code.
    pub code: String,
    /// Current lifecycle state.
    pub status: SolveStatus,
    /// Last status message.
    pub message: String,
    /// Default solve configuration, used when a submission carries none.
    pub options: SolveOptions,
    /// Latest result summary.
    pub summary: PlanSummary,
}

impl Plan {
    /// A freshly provisioned plan with default options and an empty summary.
    pub fn new(key: PlanKey, code: impl Into<String>) -> Self {
        Self {
            key,
            code: code.into(),
            status: SolveStatus::Created,
            message: String::new(),
            options: SolveOptions::default(),
            summary: PlanSummary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_starts_created() {
        let plan = Plan::new(PlanKey::new(7, 42), "PLAN-42");
        assert_eq!(plan.status, SolveStatus::Created);
        assert!(plan.message.is_empty());
        assert_eq!(plan.summary, PlanSummary::default());
    }

    #[test]
    fn key_display_is_tenant_then_plan() {
        assert_eq!(PlanKey::new(3, 9).to_string(), "3:9");
    }
}
