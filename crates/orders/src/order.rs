use serde::{Deserialize, Serialize};

use backshop_core::{Entity, ItemId, OrderId};

/// A committed order.
///
/// `order_no` is the human-facing identifier; lookups are case-insensitive
/// but the stored string keeps whatever casing it was last written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_no: String,
    pub item_id: ItemId,
    pub quantity: u32,
    /// Total price snapshotted at write time; never recomputed afterwards.
    pub price: u64,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Field set for persisting an order; id and order number are assigned by
/// the store at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub item_id: ItemId,
    pub quantity: u32,
    pub price: u64,
}

/// Total price of an order at write time.
pub fn total_price(quantity: u32, unit_price: u64) -> u64 {
    u64::from(quantity) * unit_price
}

/// Canonical lookup key for an order number: upper-cased caller input.
pub fn lookup_key(order_no: &str) -> String {
    order_no.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_quantity_times_unit_price() {
        assert_eq!(total_price(5, 3), 15);
        assert_eq!(total_price(0, 99), 0);
    }

    #[test]
    fn lookup_key_upper_cases() {
        assert_eq!(lookup_key("o10"), "O10");
        assert_eq!(lookup_key("O10"), "O10");
    }
}
