//! Item catalog operations.

use std::sync::Arc;

use tracing::instrument;

use backshop_catalog::{Item, ItemDraft};
use backshop_core::{ItemId, Page};

use crate::stock_oracle::StockOracle;
use crate::store::{ItemStore, StoreResult};

/// A catalog item together with its derived stock, for read endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWithStock {
    pub item: Item,
    pub remaining_stock: i64,
}

/// CRUD over the item catalog.
///
/// Reads report the derived stock next to the catalog fields; writes touch
/// the catalog only. No cross-entity checks: deleting an item that still has
/// movements or orders is permitted and orphans those references.
#[derive(Clone)]
pub struct CatalogService {
    items: Arc<dyn ItemStore>,
    oracle: StockOracle,
}

impl CatalogService {
    pub fn new(items: Arc<dyn ItemStore>, oracle: StockOracle) -> Self {
        Self { items, oracle }
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: ItemDraft) -> StoreResult<Item> {
        self.items.insert(draft).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ItemId) -> StoreResult<ItemWithStock> {
        let item = self.items.get(id).await?;
        let remaining_stock = self.oracle.available(id).await?;
        Ok(ItemWithStock {
            item,
            remaining_stock,
        })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u32, size: u32) -> StoreResult<Page<ItemWithStock>> {
        let page = self.items.list(page, size).await?;

        let mut items = Vec::with_capacity(page.items.len());
        for item in &page.items {
            let remaining_stock = self.oracle.available(item.id).await?;
            items.push(ItemWithStock {
                item: item.clone(),
                remaining_stock,
            });
        }

        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: ItemId, draft: ItemDraft) -> StoreResult<Item> {
        self.items.replace(id, draft).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ItemId) -> StoreResult<()> {
        self.items.remove(id).await
    }
}
