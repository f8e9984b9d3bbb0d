//! In-process reference implementation of [`LockService`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{LockService, LockToken};

/// Namespace prepended to every key, keeping the lock space disjoint from
/// other users of the same coordination backend.
const KEY_NAMESPACE: &str = "dispatch:solver:lock:";

struct Holder {
    owner: u64,
    expires_at: Option<Instant>,
}

/// Process-local lock service with lazy lease expiry.
///
/// Suitable for single-node deployments and tests; a multi-process
/// deployment substitutes an implementation backed by its coordination
/// service through the same trait. Indefinite leases (`ttl = None`) live
/// exactly as long as this process, which satisfies the keep-alive contract
/// for an in-process holder.
#[derive(Default)]
pub struct MemoryLockService {
    holders: Mutex<HashMap<String, Holder>>,
    next_owner: AtomicU64,
}

impl LockService for MemoryLockService {
    fn try_acquire(&self, key: &str, ttl: Option<Duration>) -> Option<LockToken> {
        let namespaced = format!("{KEY_NAMESPACE}{key}");
        let mut holders = self
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some(holder) = holders.get(&namespaced) {
            let expired = holder.expires_at.is_some_and(|at| at <= now);
            if !expired {
                return None;
            }
        }
        let owner = self.next_owner.fetch_add(1, Ordering::Relaxed);
        holders.insert(
            namespaced.clone(),
            Holder {
                owner,
                expires_at: ttl.map(|d| now + d),
            },
        );
        Some(LockToken::new(namespaced, owner))
    }

    fn release(&self, token: LockToken) {
        let mut holders = self
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match holders.get(token.key()) {
            Some(holder) if holder.owner == token.owner() => {
                holders.remove(token.key());
            }
            _ => {
                log::warn!(
                    "Skipped release of {}: token is not the current holder",
                    token.key()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let service = MemoryLockService::default();
        let token = service.try_acquire("solve:1:1", None).unwrap();
        assert!(service.try_acquire("solve:1:1", None).is_none());
        service.release(token);
        assert!(service.try_acquire("solve:1:1", None).is_some());
    }

    #[test]
    fn distinct_keys_do_not_contend() {
        let service = MemoryLockService::default();
        let _a = service.try_acquire("solve:1:1", None).unwrap();
        assert!(service.try_acquire("solve:1:2", None).is_some());
    }

    #[test]
    fn expired_leases_can_be_reacquired() {
        let service = MemoryLockService::default();
        let _stale = service
            .try_acquire("solve:1:1", Some(Duration::ZERO))
            .unwrap();
        assert!(service.try_acquire("solve:1:1", None).is_some());
    }

    #[test]
    fn stale_token_does_not_release_the_new_holder() {
        let service = MemoryLockService::default();
        let stale = service
            .try_acquire("solve:1:1", Some(Duration::ZERO))
            .unwrap();
        let fresh = service.try_acquire("solve:1:1", None).unwrap();
        // The expired acquisition must not free the new lease.
        service.release(stale);
        assert!(service.try_acquire("solve:1:1", None).is_none());
        service.release(fresh);
        assert!(service.try_acquire("solve:1:1", None).is_some());
    }

    #[test]
    fn tokens_carry_the_namespaced_key() {
        let service = MemoryLockService::default();
        let token = service.try_acquire("solve:9:9", None).unwrap();
        assert_eq!(token.key(), "dispatch:solver:lock:solve:9:9");
    }
}
