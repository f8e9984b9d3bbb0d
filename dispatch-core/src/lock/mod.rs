//! Cluster-wide mutual exclusion with lease semantics.
//!
//! The [`LockService`] trait is the seam between the orchestration logic and
//! whatever coordination service a deployment uses. Acquisition is
//! non-blocking; a successful acquire yields a [`LockToken`] whose ownership
//! transfers from the submission path into the asynchronous run via a
//! [`LockGuard`], which releases on drop so the key is freed on every exit
//! path.

mod memory;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use memory::MemoryLockService;

use crate::PlanKey;

/// Lock key for a plan's solve: `solve:{tenant}:{plan}`.
pub fn solve_lock_key(key: PlanKey) -> String {
    format!("solve:{}:{}", key.tenant_id, key.plan_id)
}

/// Proof of a successful acquisition.
///
/// Tokens are minted by [`LockService`] implementations and consumed by
/// [`LockService::release`]. The owner discriminates acquisitions of the same
/// key over time, so a stale token cannot release a lease it no longer holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    key: String,
    owner: u64,
}

impl LockToken {
    /// Mint a token; implementations call this on successful acquire.
    pub fn new(key: impl Into<String>, owner: u64) -> Self {
        Self {
            key: key.into(),
            owner,
        }
    }

    /// The locked key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The acquisition this token belongs to.
    pub fn owner(&self) -> u64 {
        self.owner
    }
}

/// Non-blocking, lease-based mutual exclusion.
///
/// `ttl = Some(d)` bounds orphaned locks: the lease expires after `d` even if
/// the holder crashes. `ttl = None` requests an indefinite lease that must be
/// kept alive only as long as the holding process lives, so a crashed holder
/// still frees the key eventually.
pub trait LockService: Send + Sync {
    /// Attempt to take the lock; returns `None` immediately when held.
    fn try_acquire(&self, key: &str, ttl: Option<Duration>) -> Option<LockToken>;

    /// Release a previously acquired lock. A no-op (logged) when the token
    /// is not the current holder, e.g. after lease expiry and re-acquisition
    /// by another process.
    fn release(&self, token: LockToken);
}

/// Scoped release: frees the lock when dropped.
///
/// The guard is the token object handed from the submission path into the
/// enqueued work item; because release happens in `Drop`, it runs on every
/// exit path of the run, including panics.
pub struct LockGuard {
    service: Arc<dyn LockService>,
    token: Option<LockToken>,
}

impl LockGuard {
    /// Wrap an acquired token for scoped release through `service`.
    pub fn new(service: Arc<dyn LockService>, token: LockToken) -> Self {
        Self {
            service,
            token: Some(token),
        }
    }

    /// The locked key, until the guard is dropped.
    pub fn key(&self) -> Option<&str> {
        self.token.as_ref().map(LockToken::key)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.service.release(token);
        }
    }
}

impl fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_lock_keys_are_plan_scoped() {
        assert_eq!(solve_lock_key(PlanKey::new(1, 1001)), "solve:1:1001");
        assert_ne!(
            solve_lock_key(PlanKey::new(1, 1)),
            solve_lock_key(PlanKey::new(2, 1))
        );
    }

    #[test]
    fn guard_releases_on_drop() {
        let service = Arc::new(MemoryLockService::default());
        let token = service.try_acquire("solve:1:1", None).unwrap();
        {
            let _guard = LockGuard::new(service.clone(), token);
            assert!(service.try_acquire("solve:1:1", None).is_none());
        }
        assert!(service.try_acquire("solve:1:1", None).is_some());
    }
}
