//! Infrastructure layer: storage, per-item serialization, application services.
//!
//! Storage comes in two flavors behind the same traits: in-memory (dev/test)
//! and Postgres via sqlx (`DATABASE_URL` deployments). The services own the
//! orchestration the HTTP layer calls into, including the stock-check-then-
//! write critical sections.

pub mod locks;
pub mod services;
pub mod stock_oracle;
pub mod store;


pub use locks::ItemLocks;
pub use services::{CatalogService, IssuanceService, ItemWithStock, LedgerService};
pub use stock_oracle::StockOracle;
pub use store::{
    memory::{InMemoryItemStore, InMemoryLedgerStore, InMemoryOrderStore},
    postgres::{ensure_schema, PostgresItemStore, PostgresLedgerStore, PostgresOrderStore},
    ItemStore, LedgerStore, OrderStore, StoreError, StoreResult,
};
