//! Service construction for the two storage backends.

use std::sync::Arc;

use sqlx::PgPool;

use backshop_infra::{
    CatalogService, InMemoryItemStore, InMemoryLedgerStore, InMemoryOrderStore, IssuanceService,
    ItemLocks, ItemStore, LedgerService, LedgerStore, OrderStore, PostgresItemStore,
    PostgresLedgerStore, PostgresOrderStore, StockOracle,
};

/// The services the routes call into, wired over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub ledger: LedgerService,
    pub issuance: IssuanceService,
}

impl AppServices {
    /// In-memory storage (dev/test).
    pub fn in_memory() -> Self {
        Self::wire(
            Arc::new(InMemoryItemStore::new()),
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryOrderStore::new()),
        )
    }

    /// Postgres-backed storage.
    pub fn postgres(pool: PgPool) -> Self {
        Self::wire(
            Arc::new(PostgresItemStore::new(pool.clone())),
            Arc::new(PostgresLedgerStore::new(pool.clone())),
            Arc::new(PostgresOrderStore::new(pool)),
        )
    }

    fn wire(
        items: Arc<dyn ItemStore>,
        ledger: Arc<dyn LedgerStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        let locks = Arc::new(ItemLocks::new());
        let oracle = StockOracle::new(ledger.clone());

        Self {
            catalog: CatalogService::new(items.clone(), oracle.clone()),
            ledger: LedgerService::new(ledger, locks.clone()),
            issuance: IssuanceService::new(orders, items, oracle, locks),
        }
    }
}
