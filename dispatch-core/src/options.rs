//! Solve configuration carried by submissions and plans.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for a single solve.
///
/// Validated before any job is created; see [`SolveOptions::validate`].
///
/// # Examples
///
/// ```
/// use dispatch_core::SolveOptions;
///
/// let options = SolveOptions::default();
/// assert!(options.validate().is_ok());
/// assert!(options.allow_drop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Wall-clock budget the optimizer must honor.
    pub time_limit: Duration,
    /// Whether tasks may be dropped at a penalty instead of failing the
    /// whole problem.
    pub allow_drop: bool,
    /// Objective penalty per dropped task; higher values favor assigning
    /// more tasks.
    pub unassigned_penalty: i64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            allow_drop: true,
            unassigned_penalty: 10_000,
        }
    }
}

/// Rejected solve options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The time budget was outside the accepted window.
    #[error("time limit must be between {min:?} and {max:?}, got {got:?}")]
    TimeLimitOutOfRange {
        /// Smallest accepted budget.
        min: Duration,
        /// Largest accepted budget.
        max: Duration,
        /// The rejected value.
        got: Duration,
    },
    /// The penalty weight was negative.
    #[error("unassigned penalty must be non-negative, got {0}")]
    NegativePenalty(i64),
}

impl SolveOptions {
    /// Smallest accepted time budget.
    pub const MIN_TIME_LIMIT: Duration = Duration::from_secs(1);
    /// Largest accepted time budget.
    pub const MAX_TIME_LIMIT: Duration = Duration::from_secs(300);

    /// Reject out-of-range budgets and negative penalties.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.time_limit < Self::MIN_TIME_LIMIT || self.time_limit > Self::MAX_TIME_LIMIT {
            return Err(OptionsError::TimeLimitOutOfRange {
                min: Self::MIN_TIME_LIMIT,
                max: Self::MAX_TIME_LIMIT,
                got: self.time_limit,
            });
        }
        if self.unassigned_penalty < 0 {
            return Err(OptionsError::NegativePenalty(self.unassigned_penalty));
        }
        Ok(())
    }
}
