use serde::{Deserialize, Serialize};

use backshop_core::{DomainError, DomainResult, Entity, ItemId};

/// Catalog item: identity, display name, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Unit price in the smallest currency unit (e.g. cents).
    pub price: u64,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Validated field set for creating or replacing an item.
///
/// The id is storage-assigned, so a draft carries everything but identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    name: String,
    price: u64,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: u64) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be blank"));
        }
        Ok(Self { name, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// Attach a storage-assigned id, producing the full entity.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_zero_price() {
        let draft = ItemDraft::new("Shoe", 0).unwrap();
        assert_eq!(draft.price(), 0);
    }

    #[test]
    fn draft_rejects_blank_name() {
        assert!(matches!(
            ItemDraft::new("", 25),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            ItemDraft::new("   ", 25),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn draft_keeps_name_verbatim() {
        let item = ItemDraft::new(" Shoe ", 25).unwrap().into_item(ItemId::new(5));
        assert_eq!(item.name, " Shoe ");
        assert_eq!(item.id, ItemId::new(5));
    }
}
