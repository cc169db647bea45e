//! Order domain module.
//!
//! Orders snapshot their price at write time (`quantity * unit price`); a
//! later catalog price change never touches an existing order. The
//! human-facing order number is allocated once at creation and preserved
//! across updates.

pub mod number;
pub mod order;

pub use number::OrderNumber;
pub use order::{lookup_key, total_price, Order, OrderDraft};
