//! Read-only stock view for order issuance.

use std::sync::Arc;

use backshop_core::ItemId;

use crate::store::{LedgerStore, StoreResult};

/// Answers "how many units of item X are available right now".
///
/// A thin pass-through to the ledger fold, kept as a seam so order issuance
/// does not depend on ledger internals and an alternate stock policy
/// (reservations, soft holds) could be substituted without touching it.
#[derive(Clone)]
pub struct StockOracle {
    ledger: Arc<dyn LedgerStore>,
}

impl StockOracle {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn available(&self, item_id: ItemId) -> StoreResult<i64> {
        self.ledger.stock_of(item_id).await
    }
}
