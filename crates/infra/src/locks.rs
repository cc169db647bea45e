//! Per-item serialization for stock-check-then-write sequences.
//!
//! The ledger fold and the write that depends on it span two storage calls.
//! Holding the item's lock across both is what keeps a concurrently
//! committing writer from invalidating the fold a caller just observed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use backshop_core::ItemId;

/// Registry of one async mutex per item id.
///
/// Locks are created lazily on first use and kept for the life of the
/// registry. Shared by every service that reads stock and then writes.
#[derive(Debug, Default)]
pub struct ItemLocks {
    inner: Mutex<HashMap<ItemId, Arc<AsyncMutex<()>>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one item.
    pub async fn acquire(&self, item_id: ItemId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap();
            map.entry(item_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Acquire locks for several items.
    ///
    /// Ids are deduplicated and taken in ascending order, so two callers
    /// locking overlapping sets cannot deadlock.
    pub async fn acquire_many(&self, item_ids: &[ItemId]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<ItemId> = item_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.acquire(id).await);
        }
        guards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_item_serializes() {
        let locks = Arc::new(ItemLocks::new());
        let active = Arc::new(AtomicU32::new(0));
        let done = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let active = active.clone();
            let done = done.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(ItemId::new(1)).await;
                // Nobody else is inside this item's critical section.
                assert_eq!(active.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                active.fetch_sub(1, Ordering::SeqCst);
                done.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(done.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn overlapping_sets_do_not_deadlock() {
        let locks = Arc::new(ItemLocks::new());

        let a = {
            let locks = locks.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _guards = locks
                        .acquire_many(&[ItemId::new(1), ItemId::new(2)])
                        .await;
                }
            })
        };
        let b = {
            let locks = locks.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _guards = locks
                        .acquire_many(&[ItemId::new(2), ItemId::new(1)])
                        .await;
                }
            })
        };

        a.await.unwrap();
        b.await.unwrap();
    }
}
