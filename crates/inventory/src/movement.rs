use core::str::FromStr;
use serde::{Deserialize, Serialize};

use backshop_core::{DomainError, DomainResult, Entity, ItemId, MovementId};

/// Direction of an inventory movement.
///
/// Wire and storage encoding is the single letter the original ledger used:
/// `"T"` for top-ups, `"W"` for withdrawals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Increases stock.
    #[serde(rename = "T")]
    TopUp,
    /// Decreases stock.
    #[serde(rename = "W")]
    Withdrawal,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopUp => "T",
            Direction::Withdrawal => "W",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "T" => Ok(Direction::TopUp),
            "W" => Ok(Direction::Withdrawal),
            other => Err(DomainError::validation(format!(
                "direction must be T or W, got {other:?}"
            ))),
        }
    }
}

/// One ledger record: a quantity moved in or out for an item.
///
/// The referenced item is not required to pre-exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub direction: Direction,
}

impl Movement {
    /// The movement's contribution to the stock fold.
    pub fn signed_quantity(&self) -> i64 {
        match self.direction {
            Direction::TopUp => i64::from(self.quantity),
            Direction::Withdrawal => -i64::from(self.quantity),
        }
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Field set for recording or replacing a movement; ids are storage-assigned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MovementDraft {
    pub item_id: ItemId,
    pub quantity: u32,
    pub direction: Direction,
}

impl MovementDraft {
    pub fn new(item_id: ItemId, quantity: u32, direction: Direction) -> Self {
        Self {
            item_id,
            quantity,
            direction,
        }
    }

    pub fn into_movement(self, id: MovementId) -> Movement {
        Movement {
            id,
            item_id: self.item_id,
            quantity: self.quantity,
            direction: self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("T".parse::<Direction>().unwrap(), Direction::TopUp);
        assert_eq!("w".parse::<Direction>().unwrap(), Direction::Withdrawal);
    }

    #[test]
    fn direction_rejects_unknown_letters() {
        assert!(matches!(
            "X".parse::<Direction>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn withdrawal_counts_negative() {
        let m = MovementDraft::new(ItemId::new(1), 4, Direction::Withdrawal)
            .into_movement(MovementId::new(9));
        assert_eq!(m.signed_quantity(), -4);
    }
}
