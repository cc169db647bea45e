//! Postgres-backed stores (sqlx).
//!
//! The stock fold is pushed down to SQL as a `SUM(CASE …)` aggregate, and
//! order-number allocation reads the `order_sequence` row `FOR UPDATE` inside
//! the same transaction as the order insert, so allocation serializes at the
//! database even across processes.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use backshop_catalog::{Item, ItemDraft};
use backshop_core::{DomainError, ItemId, MovementId, OrderId, Page};
use backshop_inventory::{Direction, Movement, MovementDraft};
use backshop_orders::{lookup_key, Order, OrderDraft, OrderNumber};

use super::{ItemStore, LedgerStore, OrderStore, StoreError, StoreResult};

/// Create the tables and the sequence cell if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../schema/postgres.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

fn price_to_db(price: u64) -> StoreResult<i64> {
    i64::try_from(price)
        .map_err(|_| DomainError::validation("price out of range").into())
}

fn price_from_db(price: i64) -> StoreResult<u64> {
    u64::try_from(price)
        .map_err(|_| DomainError::corruption("negative price in storage").into())
}

fn quantity_from_db(quantity: i64) -> StoreResult<u32> {
    u32::try_from(quantity)
        .map_err(|_| DomainError::corruption("quantity out of range in storage").into())
}

fn item_from_row(row: &PgRow) -> StoreResult<Item> {
    Ok(Item {
        id: ItemId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        price: price_from_db(row.try_get("price")?)?,
    })
}

fn movement_from_row(row: &PgRow) -> StoreResult<Movement> {
    let direction: String = row.try_get("direction")?;
    let direction = direction
        .parse::<Direction>()
        .map_err(|_| DomainError::corruption(format!("direction {direction:?} in storage")))?;
    Ok(Movement {
        id: MovementId::new(row.try_get("id")?),
        item_id: ItemId::new(row.try_get("item_id")?),
        quantity: quantity_from_db(row.try_get("quantity")?)?,
        direction,
    })
}

fn order_from_row(row: &PgRow) -> StoreResult<Order> {
    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        order_no: row.try_get("order_no")?,
        item_id: ItemId::new(row.try_get("item_id")?),
        quantity: quantity_from_db(row.try_get("quantity")?)?,
        price: price_from_db(row.try_get("price")?)?,
    })
}

/// Postgres item catalog.
#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ItemStore for PostgresItemStore {
    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: ItemDraft) -> StoreResult<Item> {
        let row = sqlx::query(
            "INSERT INTO items (name, price) VALUES ($1, $2) RETURNING id, name, price",
        )
        .bind(draft.name())
        .bind(price_to_db(draft.price())?)
        .fetch_one(&self.pool)
        .await?;

        item_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: ItemId) -> StoreResult<Item> {
        let row = sqlx::query("SELECT id, name, price FROM items WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::from(DomainError::item_not_found(id)))?;

        item_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Item>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query("SELECT id, name, price FROM items ORDER BY id LIMIT $1 OFFSET $2")
            .bind(i64::from(size))
            .bind(i64::from(page) * i64::from(size))
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(item_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Page::from_counts(items, page, size, total as u64))
    }

    #[instrument(skip(self, draft), err)]
    async fn replace(&self, id: ItemId, draft: ItemDraft) -> StoreResult<Item> {
        let row = sqlx::query(
            "UPDATE items SET name = $2, price = $3 WHERE id = $1 RETURNING id, name, price",
        )
        .bind(id.as_i64())
        .bind(draft.name())
        .bind(price_to_db(draft.price())?)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::from(DomainError::item_not_found(id)))?;

        item_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn remove(&self, id: ItemId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::item_not_found(id).into());
        }
        Ok(())
    }
}

/// Postgres inventory ledger.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(skip(self, draft), err)]
    async fn record(&self, draft: MovementDraft) -> StoreResult<Movement> {
        let row = sqlx::query(
            "INSERT INTO inventory_movements (item_id, quantity, direction)
             VALUES ($1, $2, $3)
             RETURNING id, item_id, quantity, direction",
        )
        .bind(draft.item_id.as_i64())
        .bind(i64::from(draft.quantity))
        .bind(draft.direction.as_str())
        .fetch_one(&self.pool)
        .await?;

        movement_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: MovementId) -> StoreResult<Movement> {
        let row = sqlx::query(
            "SELECT id, item_id, quantity, direction FROM inventory_movements WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::from(DomainError::movement_not_found(id)))?;

        movement_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Movement>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_movements")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            "SELECT id, item_id, quantity, direction FROM inventory_movements
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await?;

        let movements = rows
            .iter()
            .map(movement_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Page::from_counts(movements, page, size, total as u64))
    }

    #[instrument(skip(self, draft), err)]
    async fn replace(&self, id: MovementId, draft: MovementDraft) -> StoreResult<Movement> {
        let row = sqlx::query(
            "UPDATE inventory_movements SET item_id = $2, quantity = $3, direction = $4
             WHERE id = $1
             RETURNING id, item_id, quantity, direction",
        )
        .bind(id.as_i64())
        .bind(draft.item_id.as_i64())
        .bind(i64::from(draft.quantity))
        .bind(draft.direction.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::from(DomainError::movement_not_found(id)))?;

        movement_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn remove(&self, id: MovementId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM inventory_movements WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::movement_not_found(id).into());
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn stock_of(&self, item_id: ItemId) -> StoreResult<i64> {
        // Same fold as backshop_inventory::stock_of, pushed down to SQL.
        let stock: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(CASE WHEN direction = 'T' THEN quantity ELSE -quantity END), 0)
             FROM inventory_movements
             WHERE item_id = $1",
        )
        .bind(item_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(stock)
    }
}

/// Postgres order store.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: OrderDraft) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the sequence cell serializes allocation across writers.
        let last: Option<String> =
            sqlx::query_scalar("SELECT last_order_no FROM order_sequence WHERE id FOR UPDATE")
                .fetch_one(&mut *tx)
                .await?;

        let last = last
            .map(|s| s.parse::<OrderNumber>())
            .transpose()
            .map_err(StoreError::from)?;
        let number = OrderNumber::next(last.as_ref());
        let order_no = number.to_string();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (order_no, item_id, quantity, price)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&order_no)
        .bind(draft.item_id.as_i64())
        .bind(i64::from(draft.quantity))
        .bind(price_to_db(draft.price)?)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE order_sequence SET last_order_no = $1 WHERE id")
            .bind(&order_no)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(id),
            order_no,
            item_id: draft.item_id,
            quantity: draft.quantity,
            price: draft.price,
        })
    }

    #[instrument(skip(self), err)]
    async fn get_by_order_no(&self, key: &str) -> StoreResult<Order> {
        let row = sqlx::query(
            "SELECT id, order_no, item_id, quantity, price FROM orders WHERE UPPER(order_no) = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::from(DomainError::order_not_found(key)))?;

        order_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, page: u32, size: u32) -> StoreResult<Page<Order>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            "SELECT id, order_no, item_id, quantity, price FROM orders
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await?;

        let orders = rows
            .iter()
            .map(order_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Page::from_counts(orders, page, size, total as u64))
    }

    #[instrument(skip(self, draft), err)]
    async fn replace(
        &self,
        id: OrderId,
        order_no: String,
        draft: OrderDraft,
    ) -> StoreResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET order_no = $2, item_id = $3, quantity = $4, price = $5
             WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(&order_no)
        .bind(draft.item_id.as_i64())
        .bind(i64::from(draft.quantity))
        .bind(price_to_db(draft.price)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::order_not_found(lookup_key(&order_no)).into());
        }

        Ok(Order {
            id,
            order_no,
            item_id: draft.item_id,
            quantity: draft.quantity,
            price: draft.price,
        })
    }

    #[instrument(skip(self), err)]
    async fn remove(&self, id: OrderId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
