//! Inventory ledger operations.

use std::sync::Arc;

use tracing::instrument;

use backshop_core::{DomainError, ItemId, MovementId, Page};
use backshop_inventory::{ensure_covers, Direction, Movement, MovementDraft};

use crate::locks::ItemLocks;
use crate::store::{LedgerStore, StoreResult};

/// Movement CRUD plus the stock guards around it.
///
/// Every write that could take an item's fold negative runs under that
/// item's lock, so the fold read by the guard is the fold the commit acts on.
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<dyn LedgerStore>,
    locks: Arc<ItemLocks>,
}

impl LedgerService {
    pub fn new(ledger: Arc<dyn LedgerStore>, locks: Arc<ItemLocks>) -> Self {
        Self { ledger, locks }
    }

    #[instrument(skip(self, draft))]
    pub async fn record(&self, draft: MovementDraft) -> StoreResult<Movement> {
        let _guard = self.locks.acquire(draft.item_id).await;

        if draft.direction == Direction::Withdrawal {
            let available = self.ledger.stock_of(draft.item_id).await?;
            ensure_covers(draft.item_id, available, draft.quantity)?;
        }

        self.ledger.record(draft).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: MovementId) -> StoreResult<Movement> {
        self.ledger.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Movement>> {
        self.ledger.list(page, size).await
    }

    /// Replace the id-indexed record in place.
    ///
    /// The guard recomputes the fold with the replacement applied: the old
    /// record's contribution leaves, the new one enters, and every affected
    /// item must stay non-negative. (Checking only the pre-replacement fold
    /// would admit replacements that strand an item below zero.)
    #[instrument(skip(self, draft))]
    pub async fn replace(&self, id: MovementId, draft: MovementDraft) -> StoreResult<Movement> {
        let (_guards, old) = loop {
            let old = self.ledger.get(id).await?;
            let guards = self
                .locks
                .acquire_many(&[old.item_id, draft.item_id])
                .await;

            // The lock set must cover the movement's current item; re-read
            // under the locks and retake if it moved in between.
            let confirmed = self.ledger.get(id).await?;
            if confirmed.item_id == old.item_id {
                break (guards, confirmed);
            }
        };

        let replacement = draft.into_movement(id);
        for item_id in affected_items(&old, &replacement) {
            let available = self.ledger.stock_of(item_id).await?;
            let mut post = available;
            if old.item_id == item_id {
                post -= old.signed_quantity();
            }
            if replacement.item_id == item_id {
                post += replacement.signed_quantity();
            }
            if post < 0 {
                return Err(DomainError::InsufficientStock {
                    item_id,
                    requested: draft.quantity,
                    available,
                }
                .into());
            }
        }

        self.ledger.replace(id, draft).await
    }

    /// Remove by id. Stock-wise unguarded (the contract specifies only the
    /// not-found failure), but still serialized against checks on the same
    /// item.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: MovementId) -> StoreResult<()> {
        let _guards = loop {
            let old = self.ledger.get(id).await?;
            let guards = self.locks.acquire_many(&[old.item_id]).await;

            let confirmed = self.ledger.get(id).await?;
            if confirmed.item_id == old.item_id {
                break guards;
            }
        };

        self.ledger.remove(id).await
    }

    #[instrument(skip(self))]
    pub async fn stock_of(&self, item_id: ItemId) -> StoreResult<i64> {
        self.ledger.stock_of(item_id).await
    }
}

fn affected_items(old: &Movement, new: &Movement) -> Vec<ItemId> {
    let mut ids = vec![old.item_id, new.item_id];
    ids.sort();
    ids.dedup();
    ids
}
