//! Order issuance: admission against derived stock, pricing, allocation.

use std::sync::Arc;

use tracing::instrument;

use backshop_core::{DomainError, ItemId, Page};
use backshop_inventory::ensure_covers;
use backshop_orders::{lookup_key, total_price, Order, OrderDraft};

use crate::locks::ItemLocks;
use crate::stock_oracle::StockOracle;
use crate::store::{ItemStore, OrderStore, StoreResult};

/// Issues, mutates, and serves orders.
///
/// The create/update paths check stock first, before anything else, and hold
/// the item's lock from that check until the write commits, so a ledger
/// writer cannot invalidate the admission in between. The stock check
/// deliberately precedes the item-existence check, preserving the original
/// failure ordering (quantity 0 against an unknown item passes the stock
/// gate and then surfaces not-found).
#[derive(Clone)]
pub struct IssuanceService {
    orders: Arc<dyn OrderStore>,
    items: Arc<dyn ItemStore>,
    oracle: StockOracle,
    locks: Arc<ItemLocks>,
}

impl IssuanceService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        items: Arc<dyn ItemStore>,
        oracle: StockOracle,
        locks: Arc<ItemLocks>,
    ) -> Self {
        Self {
            orders,
            items,
            oracle,
            locks,
        }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, item_id: ItemId, quantity: u32) -> StoreResult<Order> {
        let _guard = self.locks.acquire(item_id).await;

        let available = self.oracle.available(item_id).await?;
        ensure_covers(item_id, available, quantity)?;

        let item = self.items.get(item_id).await?;
        let draft = OrderDraft {
            item_id,
            quantity,
            price: total_price(quantity, item.price),
        };

        // The order number is allocated inside the store's sequence critical
        // section at commit time.
        self.orders.insert(draft).await
    }

    /// Rewrite an order in place: same admission and pricing as create, but
    /// the order number is never reallocated. The stored number keeps the
    /// caller-supplied casing.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        order_no: &str,
        item_id: ItemId,
        quantity: u32,
    ) -> StoreResult<Order> {
        let _guard = self.locks.acquire(item_id).await;

        // Stock runs once, before either lookup.
        let available = self.oracle.available(item_id).await?;
        ensure_covers(item_id, available, quantity)?;

        let existing = self.orders.get_by_order_no(&lookup_key(order_no)).await?;
        let item = self.items.get(item_id).await?;

        let draft = OrderDraft {
            item_id,
            quantity,
            price: total_price(quantity, item.price),
        };
        self.orders
            .replace(existing.id, order_no.to_string(), draft)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, order_no: &str) -> StoreResult<Order> {
        self.orders.get_by_order_no(&lookup_key(order_no)).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Order>> {
        self.orders.list(page, size).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, order_no: &str) -> StoreResult<()> {
        let key = lookup_key(order_no);
        let existing = self.orders.get_by_order_no(&key).await?;

        if !self.orders.remove(existing.id).await? {
            return Err(DomainError::order_not_found(key).into());
        }
        Ok(())
    }
}
