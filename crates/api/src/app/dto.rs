//! Request/response DTOs and JSON mapping.
//!
//! Bodies travel inside a `data` envelope and use camelCase field names, the
//! wire format the back office has always spoken. Quantities and prices are
//! unsigned in the DTOs, so negative values are rejected during
//! deserialization before they reach the core.

use serde::Deserialize;

use backshop_catalog::Item;
use backshop_core::Page;
use backshop_infra::ItemWithStock;
use backshop_inventory::Movement;
use backshop_orders::Order;

/// The `{"data": ...}` wrapper around request and response bodies.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub item_id: i64,
    pub qty: u32,
    /// Movement direction letter, `T` or `W` (case-insensitive).
    #[serde(rename = "type")]
    pub direction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersRequest {
    pub item_id: i64,
    pub qty: u32,
}

/// Paging query parameters; defaults match the original API (`page=0`,
/// `size=2`).
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(2)
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

fn envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "data": data })
}

pub fn item_to_json(item: &Item) -> serde_json::Value {
    envelope(serde_json::json!({
        "id": item.id,
        "name": item.name,
        "price": item.price,
    }))
}

pub fn item_with_stock_to_json(read: &ItemWithStock) -> serde_json::Value {
    envelope(item_with_stock_fields(read))
}

fn item_with_stock_fields(read: &ItemWithStock) -> serde_json::Value {
    serde_json::json!({
        "id": read.item.id,
        "name": read.item.name,
        "price": read.item.price,
        "remainingStock": read.remaining_stock,
    })
}

pub fn item_page_to_json(page: &Page<ItemWithStock>) -> serde_json::Value {
    envelope(serde_json::json!({
        "items": page.items.iter().map(item_with_stock_fields).collect::<Vec<_>>(),
        "page": page.page,
        "size": page.size,
        "totalItems": page.total_items,
        "totalPages": page.total_pages,
    }))
}

fn movement_fields(m: &Movement) -> serde_json::Value {
    serde_json::json!({
        "id": m.id,
        "itemId": m.item_id,
        "qty": m.quantity,
        "type": m.direction.as_str(),
    })
}

pub fn movement_to_json(m: &Movement) -> serde_json::Value {
    envelope(movement_fields(m))
}

pub fn movement_page_to_json(page: &Page<Movement>) -> serde_json::Value {
    envelope(serde_json::json!({
        "inventories": page.items.iter().map(movement_fields).collect::<Vec<_>>(),
        "page": page.page,
        "size": page.size,
        "totalItems": page.total_items,
        "totalPages": page.total_pages,
    }))
}

fn order_fields(o: &Order) -> serde_json::Value {
    serde_json::json!({
        "orderNo": o.order_no,
        "itemId": o.item_id,
        "qty": o.quantity,
        "price": o.price,
    })
}

pub fn order_to_json(o: &Order) -> serde_json::Value {
    envelope(order_fields(o))
}

pub fn order_page_to_json(page: &Page<Order>) -> serde_json::Value {
    envelope(serde_json::json!({
        "orders": page.items.iter().map(order_fields).collect::<Vec<_>>(),
        "page": page.page,
        "size": page.size,
        "totalItems": page.total_items,
        "totalPages": page.total_pages,
    }))
}
