//! In-memory storage for dev and tests.
//!
//! Each store is a `RwLock` over a `BTreeMap` keyed by id; ids are assigned
//! from a counter inside the write guard, so iteration order is insertion
//! order and list pages are stable.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use backshop_catalog::{Item, ItemDraft};
use backshop_core::{DomainError, ItemId, MovementId, OrderId, Page};
use backshop_inventory::{self as inventory, Movement, MovementDraft};
use backshop_orders::{lookup_key, Order, OrderDraft, OrderNumber};

use super::{ItemStore, LedgerStore, OrderStore, StoreResult};

fn poisoned() -> DomainError {
    DomainError::corruption("store lock poisoned")
}

#[derive(Debug, Default)]
struct ItemRows {
    rows: BTreeMap<ItemId, Item>,
    next_id: i64,
}

/// In-memory item catalog.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<ItemRows>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, draft: ItemDraft) -> StoreResult<Item> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.next_id += 1;
        let item = draft.into_item(ItemId::new(inner.next_id));
        inner.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: ItemId) -> StoreResult<Item> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        inner
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::item_not_found(id).into())
    }

    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Item>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(Page::from_full(
            inner.rows.values().cloned().collect(),
            page,
            size,
        ))
    }

    async fn replace(&self, id: ItemId, draft: ItemDraft) -> StoreResult<Item> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.rows.contains_key(&id) {
            return Err(DomainError::item_not_found(id).into());
        }
        let item = draft.into_item(id);
        inner.rows.insert(id, item.clone());
        Ok(item)
    }

    async fn remove(&self, id: ItemId) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::item_not_found(id).into())
    }
}

#[derive(Debug, Default)]
struct LedgerRows {
    rows: BTreeMap<MovementId, Movement>,
    next_id: i64,
}

/// In-memory inventory ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<LedgerRows>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn record(&self, draft: MovementDraft) -> StoreResult<Movement> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.next_id += 1;
        let movement = draft.into_movement(MovementId::new(inner.next_id));
        inner.rows.insert(movement.id, movement.clone());
        Ok(movement)
    }

    async fn get(&self, id: MovementId) -> StoreResult<Movement> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        inner
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::movement_not_found(id).into())
    }

    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Movement>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(Page::from_full(
            inner.rows.values().cloned().collect(),
            page,
            size,
        ))
    }

    async fn replace(&self, id: MovementId, draft: MovementDraft) -> StoreResult<Movement> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.rows.contains_key(&id) {
            return Err(DomainError::movement_not_found(id).into());
        }
        let movement = draft.into_movement(id);
        inner.rows.insert(id, movement.clone());
        Ok(movement)
    }

    async fn remove(&self, id: MovementId) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::movement_not_found(id).into())
    }

    async fn stock_of(&self, item_id: ItemId) -> StoreResult<i64> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let movements: Vec<Movement> = inner.rows.values().cloned().collect();
        Ok(inventory::stock_of(item_id, &movements))
    }
}

#[derive(Debug, Default)]
struct OrderRows {
    rows: BTreeMap<OrderId, Order>,
    /// Explicit sequence cell; never re-derived by scanning the rows.
    last_issued: Option<OrderNumber>,
    next_id: i64,
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<OrderRows>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the sequence cell, e.g. when mirroring a pre-existing data set.
    pub fn with_last_issued(last: OrderNumber) -> Self {
        Self {
            inner: RwLock::new(OrderRows {
                last_issued: Some(last),
                ..OrderRows::default()
            }),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, draft: OrderDraft) -> StoreResult<Order> {
        // Allocation and insert happen under the same write guard, so order
        // numbers are unique and strictly increasing across concurrent
        // inserts.
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let number = OrderNumber::next(inner.last_issued.as_ref());
        inner.next_id += 1;
        let order = Order {
            id: OrderId::new(inner.next_id),
            order_no: number.to_string(),
            item_id: draft.item_id,
            quantity: draft.quantity,
            price: draft.price,
        };
        inner.rows.insert(order.id, order.clone());
        inner.last_issued = Some(number);
        Ok(order)
    }

    async fn get_by_order_no(&self, key: &str) -> StoreResult<Order> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        inner
            .rows
            .values()
            .find(|o| lookup_key(&o.order_no) == key)
            .cloned()
            .ok_or_else(|| DomainError::order_not_found(key).into())
    }

    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Order>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(Page::from_full(
            inner.rows.values().cloned().collect(),
            page,
            size,
        ))
    }

    async fn replace(
        &self,
        id: OrderId,
        order_no: String,
        draft: OrderDraft,
    ) -> StoreResult<Order> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.rows.contains_key(&id) {
            return Err(DomainError::order_not_found(lookup_key(&order_no)).into());
        }
        let order = Order {
            id,
            order_no,
            item_id: draft.item_id,
            quantity: draft.quantity,
            price: draft.price,
        };
        inner.rows.insert(id, order.clone());
        Ok(order)
    }

    async fn remove(&self, id: OrderId) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        Ok(inner.rows.remove(&id).is_some())
    }
}
