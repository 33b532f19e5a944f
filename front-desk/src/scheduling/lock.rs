//! Per `(staff, local day)` booking locks

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock key: staff member + local calendar day
pub type BookingKey = (i64, NaiveDate);

/// Serializes commits that touch the same staff member's day
///
/// The conditional write in the repository is the final guard; this keeps
/// same-process commits for a key in arrival order.
#[derive(Debug, Default)]
pub struct BookingLocks {
    locks: DashMap<BookingKey, Arc<Mutex<()>>>,
}

impl BookingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a single key
    pub async fn acquire(&self, key: BookingKey) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key).or_default().clone();
        lock.lock_owned().await
    }

    /// Acquire several keys in a fixed order (reschedules touch two days)
    pub async fn acquire_all(&self, mut keys: Vec<BookingKey>) -> Vec<OwnedMutexGuard<()>> {
        keys.sort();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }

    /// Drop idle entries for `keys`
    ///
    /// An entry is idle when the map holds the only reference: no guard is
    /// alive and no task is waiting on it. Call after the guards are dropped.
    pub fn release(&self, keys: &[BookingKey]) {
        for key in keys {
            self.locks.remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        }
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(BookingLocks::new());
        let guard = locks.acquire((1, day(1))).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire((1, day(1))).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = BookingLocks::new();
        let _a = locks.acquire((1, day(1))).await;
        let _b = locks.acquire((2, day(1))).await;
        let _c = locks.acquire((1, day(2))).await;
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_release_drops_idle_entries_only() {
        let locks = Arc::new(BookingLocks::new());
        let held = locks.acquire((1, day(1))).await;
        drop(locks.acquire((2, day(1))).await);

        locks.release(&[(1, day(1)), (2, day(1))]);
        assert_eq!(locks.len(), 1);

        // A waiter keeps the entry alive after the holder lets go
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire((1, day(1))).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);
        locks.release(&[(1, day(1))]);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        locks.release(&[(1, day(1))]);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_acquire_all_dedups() {
        let locks = BookingLocks::new();
        let guards = locks.acquire_all(vec![(1, day(2)), (1, day(1)), (1, day(2))]).await;
        assert_eq!(guards.len(), 2);
    }
}
