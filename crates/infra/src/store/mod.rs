//! Storage traits and error model shared by the in-memory and Postgres
//! backends.

use async_trait::async_trait;
use thiserror::Error;

use backshop_catalog::{Item, ItemDraft};
use backshop_core::{DomainError, ItemId, MovementId, OrderId, Page};
use backshop_inventory::{Movement, MovementDraft};
use backshop_orders::{Order, OrderDraft};

pub mod memory;
pub mod postgres;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error: a deterministic domain failure or a database fault.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// The domain failure behind this error, if it is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            StoreError::Database(_) => None,
        }
    }
}

/// Item catalog storage. Ids are assigned on insert and immutable.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, draft: ItemDraft) -> StoreResult<Item>;

    /// Fails with `NotFound` if absent.
    async fn get(&self, id: ItemId) -> StoreResult<Item>;

    /// Stable page in id (insertion) order.
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Item>>;

    /// Replace name/price in place. Fails with `NotFound` if absent.
    async fn replace(&self, id: ItemId, draft: ItemDraft) -> StoreResult<Item>;

    /// Fails with `NotFound` if absent.
    async fn remove(&self, id: ItemId) -> StoreResult<()>;
}

/// Inventory ledger storage: movement records plus the stock fold.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn record(&self, draft: MovementDraft) -> StoreResult<Movement>;

    /// Fails with `NotFound` if absent.
    async fn get(&self, id: MovementId) -> StoreResult<Movement>;

    /// Stable page in id (insertion) order.
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Movement>>;

    /// Replace the id-indexed record in place. Fails with `NotFound` if absent.
    async fn replace(&self, id: MovementId, draft: MovementDraft) -> StoreResult<Movement>;

    /// Fails with `NotFound` if absent.
    async fn remove(&self, id: MovementId) -> StoreResult<()>;

    /// Current stock of an item: sum of top-ups minus withdrawals, 0 when the
    /// item has no movements.
    ///
    /// Callers that act on the returned value must hold the item's lock (see
    /// [`crate::ItemLocks`]) across read and write.
    async fn stock_of(&self, item_id: ItemId) -> StoreResult<i64>;
}

/// Order storage.
///
/// `insert` allocates the human-facing order number from an explicit
/// last-issued sequence cell inside the store's own critical section, so
/// numbers stay unique and strictly increasing under concurrent writers.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, draft: OrderDraft) -> StoreResult<Order>;

    /// Case-insensitive lookup; `key` must already be upper-cased. Fails with
    /// `NotFound` if absent.
    async fn get_by_order_no(&self, key: &str) -> StoreResult<Order>;

    /// Stable page in id (insertion) order.
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Order>>;

    /// Rewrite an existing order keeping its internal id and order-number
    /// identity. `order_no` is stored exactly as given (caller casing).
    async fn replace(&self, id: OrderId, order_no: String, draft: OrderDraft)
        -> StoreResult<Order>;

    /// Remove by internal id. Returns whether a record was removed.
    async fn remove(&self, id: OrderId) -> StoreResult<bool>;
}
